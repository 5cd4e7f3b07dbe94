#![allow(missing_docs)]
//! Price History types — daily candles.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Daily Price History Request
// ---------------------------------------------------------------------------

/// Query parameters for daily price history.
///
/// Used by `GET /pricehistory`. Start and end are sent as epoch milliseconds
/// at midnight UTC of the given dates.
#[derive(Debug, Clone)]
pub struct PriceHistoryRequest {
    pub symbol: String,
    /// First calendar day of the window.
    pub start_date: NaiveDate,
    /// Last calendar day of the window (inclusive).
    pub end_date: NaiveDate,
}

impl PriceHistoryRequest {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("periodType", "month".into()),
            ("frequencyType", "daily".into()),
            ("frequency", "1".into()),
            ("startDate", epoch_millis(self.start_date).to_string()),
            ("endDate", epoch_millis(self.end_date).to_string()),
        ]
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

// ---------------------------------------------------------------------------
// Candle Response
// ---------------------------------------------------------------------------

/// One OHLCV candle.
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<i64>,
    /// Epoch timestamp (milliseconds).
    pub datetime: i64,
}

/// Response from `GET /pricehistory`. Candles are ordered oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct CandleList {
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub empty: bool,
}
