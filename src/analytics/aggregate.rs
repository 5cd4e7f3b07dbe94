//! Aggregator — merge both sides into per-strike rows and summary scalars.

use std::collections::BTreeSet;

use crate::constants::defaults;
use crate::error::{OiError, Result};

use super::normalize::{StrikeKey, StrikeTable};

// ---------------------------------------------------------------------------
// Strike range
// ---------------------------------------------------------------------------

/// Inclusive strike window `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeRange {
    pub lower: f64,
    pub upper: f64,
}

impl Default for StrikeRange {
    fn default() -> Self {
        Self {
            lower: defaults::LOWER_STRIKE,
            upper: defaults::UPPER_STRIKE,
        }
    }
}

impl StrikeRange {
    /// Build a range, rejecting non-finite or inverted bounds.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(OiError::InvalidArgument(format!(
                "invalid strike range [{lower}, {upper}]"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// `center ± span`.
    pub fn around(center: f64, span: f64) -> Result<Self> {
        Self::new(center - span.abs(), center + span.abs())
    }

    pub fn contains(&self, strike: f64) -> bool {
        self.lower <= strike && strike <= self.upper
    }
}

// ---------------------------------------------------------------------------
// Rows and summary
// ---------------------------------------------------------------------------

/// Call and put open interest at one strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenInterestRow {
    pub strike: f64,
    pub calls: u64,
    pub puts: u64,
}

impl OpenInterestRow {
    /// Larger of the two sides.
    pub fn peak(&self) -> u64 {
        self.calls.max(self.puts)
    }
}

/// Chain-wide totals plus maxima restricted to the visible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub total_calls: u64,
    pub total_puts: u64,
    pub max_call_oi_in_range: u64,
    pub max_put_oi_in_range: u64,
    /// `total_puts / total_calls`, `f64::INFINITY` when there are no calls.
    pub put_call_ratio: f64,
    pub max_interest_in_range: u64,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// One row per distinct strike, ascending.
    pub rows: Vec<OpenInterestRow>,
    pub stats: SummaryStats,
}

/// Put/call ratio with the zero-call case mapped to `+∞`.
pub fn put_call_ratio(total_puts: u64, total_calls: u64) -> f64 {
    if total_calls == 0 {
        f64::INFINITY
    } else {
        total_puts as f64 / total_calls as f64
    }
}

/// Merge the two normalized sides.
///
/// Rows and totals cover every strike; only the maxima honor `range`.
pub fn aggregate(calls: &StrikeTable, puts: &StrikeTable, range: StrikeRange) -> Aggregate {
    let strikes: BTreeSet<StrikeKey> = calls.keys().chain(puts.keys()).copied().collect();

    let rows: Vec<OpenInterestRow> = strikes
        .into_iter()
        .map(|key| OpenInterestRow {
            strike: key.price(),
            calls: calls.get(&key).copied().unwrap_or(0),
            puts: puts.get(&key).copied().unwrap_or(0),
        })
        .collect();

    let total_calls: u64 = calls.values().sum();
    let total_puts: u64 = puts.values().sum();

    let in_range_max = |table: &StrikeTable| {
        table
            .iter()
            .filter(|(key, _)| range.contains(key.price()))
            .map(|(_, oi)| *oi)
            .max()
            .unwrap_or(0)
    };
    let max_call_oi_in_range = in_range_max(calls);
    let max_put_oi_in_range = in_range_max(puts);

    Aggregate {
        rows,
        stats: SummaryStats {
            total_calls,
            total_puts,
            max_call_oi_in_range,
            max_put_oi_in_range,
            put_call_ratio: put_call_ratio(total_puts, total_calls),
            max_interest_in_range: max_call_oi_in_range.max(max_put_oi_in_range),
        },
    }
}
