//! Snapshot normalizer — nested chain maps to strike-indexed open interest.

use std::collections::BTreeMap;

use crate::error::{OiError, Result};
use crate::types::option_chain::{ExpDateMap, OptionChainResponse};

// ---------------------------------------------------------------------------
// Chain snapshot
// ---------------------------------------------------------------------------

/// Point-in-time capture of both sides of an option chain, nested by
/// expiration and strike.
#[derive(Debug, Clone, Default)]
pub struct ChainSnapshot {
    pub calls: ExpDateMap,
    pub puts: ExpDateMap,
}

impl From<OptionChainResponse> for ChainSnapshot {
    fn from(resp: OptionChainResponse) -> Self {
        Self {
            calls: resp.call_exp_date_map,
            puts: resp.put_exp_date_map,
        }
    }
}

// ---------------------------------------------------------------------------
// Strike key
// ---------------------------------------------------------------------------

/// Canonical strike: the price in integer cents.
///
/// `"105"`, `"105.0"` and `105.00000000001` all map to the same key, so one
/// nominal strike never splits into several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrikeKey(i64);

impl StrikeKey {
    /// Canonicalize a strike price. `None` for negative or non-finite input.
    pub fn from_price(price: f64) -> Option<Self> {
        if !price.is_finite() || price < 0.0 {
            return None;
        }
        Some(Self((price * 100.0).round() as i64))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn price(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Open interest per strike for one side of the chain.
pub type StrikeTable = BTreeMap<StrikeKey, u64>;

/// Both sides of a chain after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedChain {
    pub calls: StrikeTable,
    pub puts: StrikeTable,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize both sides of a snapshot.
pub fn normalize(snapshot: &ChainSnapshot) -> Result<NormalizedChain> {
    Ok(NormalizedChain {
        calls: normalize_side(&snapshot.calls)?,
        puts: normalize_side(&snapshot.puts)?,
    })
}

/// Sum open interest per strike across every expiration in `map`.
///
/// Only the first contract record at each strike is read; further variants
/// listed at the same strike (adjusted or non-standard deliverables) are
/// ignored.
///
/// # Errors
///
/// [`OiError::MalformedChainData`] when a strike has no records, or its first
/// record lacks a parseable non-negative strike price or a non-negative open
/// interest.
pub fn normalize_side(map: &ExpDateMap) -> Result<StrikeTable> {
    let mut table = StrikeTable::new();

    for (expiry, strikes) in map {
        for (strike_label, contracts) in strikes {
            let at = || format!("{expiry} @ {strike_label}");

            let first = contracts
                .first()
                .ok_or_else(|| OiError::malformed(format!("{}: no contract records", at())))?;

            let price = first
                .strike_price
                .as_ref()
                .ok_or_else(|| OiError::malformed(format!("{}: missing strikePrice", at())))?;
            let key = price
                .value()
                .and_then(StrikeKey::from_price)
                .ok_or_else(|| OiError::malformed(format!("{}: invalid strikePrice {price:?}", at())))?;

            let oi = first
                .open_interest
                .ok_or_else(|| OiError::malformed(format!("{}: missing openInterest", at())))?;
            let oi = u64::try_from(oi)
                .map_err(|_| OiError::malformed(format!("{}: negative openInterest {oi}", at())))?;

            *table.entry(key).or_insert(0) += oi;
        }
    }

    Ok(table)
}
