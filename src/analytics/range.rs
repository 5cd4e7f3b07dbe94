//! Range estimator — trailing average daily range and the bands it implies.

use chrono::{Days, NaiveDate};

use crate::error::{OiError, Result};
use crate::types::price_history::Candle;

use super::round_cents;

/// One trading day's OHLC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl DailyCandle {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { open, high, low, close }
    }

    /// `high - low`.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl From<&Candle> for DailyCandle {
    fn from(c: &Candle) -> Self {
        Self::new(c.open, c.high, c.low, c.close)
    }
}

/// Calendar window to request for a `days`-long trading-day lookback:
/// `2 × days` calendar days back from `today`, ending yesterday.
///
/// Doubling the span leaves room for weekends and holidays; the caller must
/// still verify that at least `days` candles came back.
///
/// # Errors
///
/// [`OiError::InvalidArgument`] if the window reaches outside the calendar.
pub fn history_window(today: NaiveDate, days: usize) -> Result<(NaiveDate, NaiveDate)> {
    let out_of_range =
        || OiError::InvalidArgument(format!("{days}-day history window before {today} is out of range"));

    let span = u64::try_from(days)
        .ok()
        .and_then(|d| d.checked_mul(2))
        .ok_or_else(out_of_range)?;
    let start = today.checked_sub_days(Days::new(span)).ok_or_else(out_of_range)?;
    let end = today.checked_sub_days(Days::new(1)).ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// Mean of `high - low` over the most recent `days` candles, rounded to
/// cents.
///
/// `candles` must be ordered oldest to newest and end no later than
/// yesterday.
///
/// # Errors
///
/// - [`OiError::InvalidArgument`] if `days` is zero.
/// - [`OiError::InsufficientHistory`] if fewer than `days` candles are given.
pub fn average_daily_range(candles: &[DailyCandle], days: usize) -> Result<f64> {
    if days == 0 {
        return Err(OiError::InvalidArgument("ADR window must be at least one day".into()));
    }
    if candles.len() < days {
        return Err(OiError::InsufficientHistory {
            required: days,
            available: candles.len(),
        });
    }

    let recent = &candles[candles.len() - days..];
    let total: f64 = recent.iter().map(DailyCandle::range).sum();
    Ok(round_cents(total / days as f64))
}

/// Support and resistance offsets one ADR either side of the session open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdrBands {
    pub lower: f64,
    pub upper: f64,
}

impl AdrBands {
    pub fn around(open: f64, adr: f64) -> Self {
        Self {
            lower: open - adr,
            upper: open + adr,
        }
    }
}
