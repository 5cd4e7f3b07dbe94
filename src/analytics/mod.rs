//! Options-chain analytics engine.
//!
//! A stateless pipeline: every call takes a chain snapshot (plus the window
//! and ADR it needs) and returns fresh values. Nothing is cached between
//! calls, so repeated or overlapping invocations cannot interfere.
//!
//! ```text
//!  ChainSnapshot ──normalize──▶ NormalizedChain ──aggregate──▶ rows + SummaryStats
//!                                                                 │
//!                                                             max_pain
//!  [DailyCandle] ──average_daily_range──▶ ADR ──AdrBands::around(open)
//! ```
//!
//! - [`normalize`] — per-side strike tables summed across expirations
//! - [`aggregate`] — merged rows, totals, in-range maxima, put/call ratio
//! - [`max_pain`] — minimum writer-loss strike
//! - [`range`] — average daily range and bands

pub mod aggregate;
pub mod max_pain;
pub mod normalize;
pub mod range;

pub use aggregate::{Aggregate, OpenInterestRow, StrikeRange, SummaryStats, aggregate, put_call_ratio};
pub use max_pain::{max_pain, settlement_loss};
pub use normalize::{ChainSnapshot, NormalizedChain, StrikeKey, StrikeTable, normalize, normalize_side};
pub use range::{AdrBands, DailyCandle, average_daily_range, history_window};

use crate::error::{OiError, Result};

/// Everything derived from one chain snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// One row per strike, ascending.
    pub rows: Vec<OpenInterestRow>,
    pub stats: SummaryStats,
    /// `None` when the chain has no strikes.
    pub max_pain: Option<f64>,
    pub bands: AdrBands,
}

/// Run the full pipeline over one snapshot.
///
/// `window` restricts only the in-range maxima. An empty chain is not an
/// error here: it yields no rows and `max_pain == None`.
///
/// # Errors
///
/// [`OiError::MalformedChainData`] from the normalizer.
pub fn analyze(snapshot: &ChainSnapshot, window: StrikeRange, open: f64, adr: f64) -> Result<Analysis> {
    let chain = normalize(snapshot)?;
    let Aggregate { rows, stats } = aggregate(&chain.calls, &chain.puts, window);

    let max_pain = match max_pain(&rows) {
        Ok(strike) => Some(strike),
        Err(OiError::MaxPainUnavailable) => {
            tracing::warn!("chain has no strikes; max pain unavailable");
            None
        }
        Err(e) => return Err(e),
    };

    Ok(Analysis {
        rows,
        stats,
        max_pain,
        bands: AdrBands::around(open, adr),
    })
}

/// Round to two decimal places.
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
