//! Max-pain solver.

use crate::error::{OiError, Result};

use super::aggregate::OpenInterestRow;

/// Total intrinsic value option writers owe if the underlying settles at
/// `settle`.
///
/// Calls struck at or below the settlement pay `settle - strike`; puts struck
/// above it pay `strike - settle`.
pub fn settlement_loss(rows: &[OpenInterestRow], settle: f64) -> f64 {
    rows.iter()
        .map(|row| {
            if row.strike <= settle {
                row.calls as f64 * (settle - row.strike).max(0.0)
            } else {
                row.puts as f64 * (row.strike - settle).max(0.0)
            }
        })
        .sum()
}

/// Strike minimizing [`settlement_loss`], searched over the observed strikes.
///
/// Candidates are scanned in ascending strike order and only a strictly lower
/// loss replaces the incumbent, so ties resolve to the lowest strike whatever
/// order `rows` arrive in. Quadratic in the number of strikes.
///
/// # Errors
///
/// [`OiError::MaxPainUnavailable`] for an empty row set.
pub fn max_pain(rows: &[OpenInterestRow]) -> Result<f64> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    let mut best = None;
    let mut min_loss = f64::INFINITY;
    for candidate in &sorted {
        let loss = settlement_loss(&sorted, candidate.strike);
        if loss < min_loss {
            min_loss = loss;
            best = Some(candidate.strike);
        }
    }

    best.ok_or(OiError::MaxPainUnavailable)
}
