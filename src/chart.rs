//! Chart frame derivation and a plain-text renderer.
//!
//! [`ChartFrame::build`] turns a [`TickReport`] into the values a bar-chart
//! backend draws: axis limits, shaded regions outside today's range, vertical
//! price-level markers and the footer annotations. [`annotate_click`] is the
//! hit-test for the strike annotation; [`render_text`] draws the frame to a
//! terminal.

use std::fmt::{self, Write as _};

use chrono::NaiveDate;

use crate::analytics::{DailyCandle, OpenInterestRow, StrikeRange};
use crate::constants::chart::{SHADE_CEILING, TEXT_BAR_WIDTH, Y_HEADROOM};
use crate::session::TickReport;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// A vertical marker on the strike axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    LastPrice,
    HighPrice,
    LowPrice,
    PriorOpen,
    PriorHigh,
    PriorLow,
    PriorClose,
    AdrDown,
    AdrUp,
    MaxPain,
}

impl LevelKind {
    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            Self::LastPrice => "Last Price",
            Self::HighPrice => "High Price",
            Self::LowPrice => "Low Price",
            Self::PriorOpen => "Yesterday's Open",
            Self::PriorHigh => "Yesterday's High",
            Self::PriorLow => "Yesterday's Low",
            Self::PriorClose => "Yesterday's Close",
            Self::AdrDown => "ADR DN",
            Self::AdrUp => "ADR UP",
            Self::MaxPain => "Max pain",
        }
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A marker at a price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub kind: LevelKind,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Session-level inputs to a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub ticker: String,
    pub expiry: NaiveDate,
    /// Visible strike window (x-axis limits).
    pub window: StrikeRange,
    /// Prior session's candle, present only when the overlay is enabled.
    pub prior_session: Option<DailyCandle>,
}

/// Everything a renderer draws for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub title: String,
    pub x_range: (f64, f64),
    pub y_max: f64,
    /// Regions outside today's low/high.
    pub shaded: Vec<(f64, f64)>,
    pub levels: Vec<PriceLevel>,
    pub footer: Vec<String>,
}

impl ChartFrame {
    pub fn build(report: &TickReport, ctx: &FrameContext) -> Self {
        let quote = report.quote;
        let analysis = &report.analysis;

        let mut levels = vec![
            PriceLevel { kind: LevelKind::LastPrice, price: quote.last },
            PriceLevel { kind: LevelKind::HighPrice, price: quote.high },
            PriceLevel { kind: LevelKind::LowPrice, price: quote.low },
        ];

        // Prior levels only matter while price trades inside yesterday's range.
        if let Some(prior) = ctx.prior_session {
            if prior.low < quote.last && quote.last < prior.high {
                levels.extend([
                    PriceLevel { kind: LevelKind::PriorOpen, price: prior.open },
                    PriceLevel { kind: LevelKind::PriorHigh, price: prior.high },
                    PriceLevel { kind: LevelKind::PriorLow, price: prior.low },
                    PriceLevel { kind: LevelKind::PriorClose, price: prior.close },
                ]);
            }
        }

        levels.push(PriceLevel { kind: LevelKind::AdrDown, price: analysis.bands.lower });
        levels.push(PriceLevel { kind: LevelKind::AdrUp, price: analysis.bands.upper });
        if let Some(max_pain) = analysis.max_pain {
            levels.push(PriceLevel { kind: LevelKind::MaxPain, price: max_pain });
        }

        let max_pain = analysis
            .max_pain
            .map_or_else(|| "N/A".to_owned(), |p| format!("${p:.2}"));
        let footer = vec![
            format!("Expiry: {}", ctx.expiry.format("%Y-%m-%d")),
            format!("Max Pain: {max_pain}"),
            format!("Put/Call Ratio: {:.2}", analysis.stats.put_call_ratio),
            format!("Range: ${:.2}", quote.range()),
            format!("Last Updated At: {}", report.updated_at.format("%H:%M:%S")),
        ];

        let peak = analysis.stats.max_interest_in_range as f64;
        let y_max = if peak > 0.0 { peak * (1.0 + Y_HEADROOM) } else { 1.0 };

        Self {
            title: format!("Open Interest by Strike Price for {}", ctx.ticker),
            x_range: (ctx.window.lower, ctx.window.upper),
            y_max,
            shaded: vec![(0.0, quote.low), (quote.high, SHADE_CEILING)],
            levels,
            footer,
        }
    }
}

// ---------------------------------------------------------------------------
// Click annotation
// ---------------------------------------------------------------------------

/// Annotation shown where the user clicked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickAnnotation {
    pub strike: f64,
    /// Larger of call and put open interest at the strike.
    pub open_interest: u64,
}

impl ClickAnnotation {
    pub fn text(&self) -> String {
        format!("Strike: {:.2}\nOI: {}", self.strike, self.open_interest)
    }
}

/// Row nearest to the clicked x coordinate. Equidistant strikes resolve to
/// the first in `rows` order.
pub fn annotate_click(rows: &[OpenInterestRow], x: f64) -> Option<ClickAnnotation> {
    rows.iter()
        .min_by(|a, b| (a.strike - x).abs().total_cmp(&(b.strike - x).abs()))
        .map(|row| ClickAnnotation {
            strike: row.strike,
            open_interest: row.peak(),
        })
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Draw the in-window rows as horizontal call/put bars, with level markers
/// next to the nearest strike and the footer underneath.
pub fn render_text(frame: &ChartFrame, rows: &[OpenInterestRow]) -> String {
    let (lo, hi) = frame.x_range;
    let visible: Vec<&OpenInterestRow> = rows
        .iter()
        .filter(|r| lo <= r.strike && r.strike <= hi)
        .collect();

    let mut markers: Vec<Vec<LevelKind>> = vec![Vec::new(); visible.len()];
    for level in frame.levels.iter().filter(|l| lo <= l.price && l.price <= hi) {
        let nearest = visible
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.strike - level.price)
                    .abs()
                    .total_cmp(&(b.strike - level.price).abs())
            })
            .map(|(i, _)| i);
        if let Some(i) = nearest {
            markers[i].push(level.kind);
        }
    }

    let bar = |oi: u64, glyph: char| {
        let len = ((oi as f64 / frame.y_max) * TEXT_BAR_WIDTH as f64).round() as usize;
        glyph.to_string().repeat(len.min(TEXT_BAR_WIDTH))
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", frame.title);
    for (row, kinds) in visible.iter().zip(&markers) {
        let tags = if kinds.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
            format!("  <- {}", names.join(", "))
        };
        let _ = writeln!(
            out,
            "{:>9.2} C {:<width$} {}{}",
            row.strike,
            bar(row.calls, '#'),
            row.calls,
            tags,
            width = TEXT_BAR_WIDTH,
        );
        let _ = writeln!(
            out,
            "{:>9} P {:<width$} {}",
            "",
            bar(row.puts, '='),
            row.puts,
            width = TEXT_BAR_WIDTH,
        );
    }
    let _ = writeln!(out, "{}", frame.footer.join("  |  "));
    out
}
