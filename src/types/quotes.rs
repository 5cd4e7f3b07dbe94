#![allow(missing_docs)]
//! Quote types — single-symbol snapshot of the underlying.

use std::collections::HashMap;

use serde::Deserialize;

/// Price fields of a quote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFields {
    pub open_price: f64,
    pub last_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    #[serde(default)]
    pub close_price: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<i64>,
    #[serde(default)]
    pub quote_time: Option<i64>,
}

/// Per-symbol entry of the quotes response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEntry {
    #[serde(default)]
    pub asset_main_type: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    pub quote: QuoteFields,
}

/// Response from `GET /{symbol}/quotes`, keyed by symbol.
pub type QuoteResponse = HashMap<String, QuoteEntry>;
