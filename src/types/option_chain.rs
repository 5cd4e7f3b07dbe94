#![allow(missing_docs)]
//! Option Chain types — request parameters, chain envelope, contract records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Query parameters for fetching the option chain.
///
/// Used by `GET /chains`. Both sides are always requested
/// (`contractType=ALL`) with the `ANALYTICAL` strategy, which carries the
/// per-contract open interest.
#[derive(Debug, Clone)]
pub struct OptionChainRequest {
    /// Underlying symbol (e.g. `TQQQ`).
    pub symbol: String,
    /// Earliest expiration to include.
    pub from_date: NaiveDate,
    /// Latest expiration to include.
    pub to_date: NaiveDate,
}

impl OptionChainRequest {
    /// A request scoped to a single expiration date.
    pub fn single_expiry(symbol: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            from_date: expiry,
            to_date: expiry,
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("contractType", "ALL".into()),
            ("strategy", "ANALYTICAL".into()),
            ("fromDate", self.from_date.format("%Y-%m-%d").to_string()),
            ("toDate", self.to_date.format("%Y-%m-%d").to_string()),
            ("includeUnderlyingQuote", "false".into()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Contract record
// ---------------------------------------------------------------------------

/// Strike price as it appears on a contract record.
///
/// The API sends a JSON number, but the strike keys of the date maps are
/// strings and some feeds echo them back as strings too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StrikePrice {
    Number(f64),
    Text(String),
}

impl StrikePrice {
    /// Numeric value, or `None` if the text form does not parse.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for StrikePrice {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// A single option contract at one strike and expiration.
///
/// Only `strike_price` and `open_interest` feed the analytics, so only they
/// are decoded; pricing and greeks fields are ignored whatever their type.
/// Both are optional so a record missing either surfaces as malformed chain
/// data instead of a deserialization failure of the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    #[serde(default)]
    pub strike_price: Option<StrikePrice>,
    #[serde(default)]
    pub open_interest: Option<i64>,
}

impl OptionContract {
    pub fn new(strike_price: impl Into<StrikePrice>, open_interest: i64) -> Self {
        Self {
            strike_price: Some(strike_price.into()),
            open_interest: Some(open_interest),
            ..Self::default()
        }
    }
}

/// Expiration key (e.g. `"2026-10-23:4"`) → strike key (e.g. `"105.0"`) →
/// contracts at that strike.
pub type ExpDateMap = HashMap<String, HashMap<String, Vec<OptionContract>>>;

// ---------------------------------------------------------------------------
// Option Chain Response
// ---------------------------------------------------------------------------

/// Response from `GET /chains`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub number_of_contracts: Option<i64>,
    #[serde(default)]
    pub call_exp_date_map: ExpDateMap,
    #[serde(default)]
    pub put_exp_date_map: ExpDateMap,
}
