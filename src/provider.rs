//! Market-data provider seam.
//!
//! [`Session`](crate::session::Session) is generic over [`MarketData`] so the
//! refresh loop runs the same against the live [`SchwabClient`] and an
//! in-memory provider in tests.

use std::future::Future;

use chrono::NaiveDate;

use crate::analytics::{ChainSnapshot, DailyCandle, round_cents};
use crate::client::SchwabClient;
use crate::error::{OiError, Result};
use crate::types::option_chain::OptionChainRequest;
use crate::types::price_history::PriceHistoryRequest;
use crate::types::quotes::QuoteResponse;

/// Session prices of the underlying, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub open: f64,
    pub last: f64,
    pub high: f64,
    pub low: f64,
}

impl Quote {
    /// Today's `high - low`.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// The three provider calls the refresh loop depends on.
///
/// Implementations report transport and auth failures as errors for which
/// [`OiError::is_provider_unavailable`] holds; they never retry themselves.
pub trait MarketData {
    /// Both sides of the chain for expirations in `[from_expiry, to_expiry]`.
    fn fetch_option_chain(
        &self,
        ticker: &str,
        from_expiry: NaiveDate,
        to_expiry: NaiveDate,
    ) -> impl Future<Output = Result<ChainSnapshot>> + Send;

    /// Daily candles between `start` and `end` inclusive, oldest first.
    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<DailyCandle>>> + Send;

    /// Current quote of the underlying.
    fn fetch_quote(&self, ticker: &str) -> impl Future<Output = Result<Quote>> + Send;
}

impl<T: MarketData + Sync> MarketData for &T {
    fn fetch_option_chain(
        &self,
        ticker: &str,
        from_expiry: NaiveDate,
        to_expiry: NaiveDate,
    ) -> impl Future<Output = Result<ChainSnapshot>> + Send {
        (**self).fetch_option_chain(ticker, from_expiry, to_expiry)
    }

    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<DailyCandle>>> + Send {
        (**self).fetch_daily_candles(ticker, start, end)
    }

    fn fetch_quote(&self, ticker: &str) -> impl Future<Output = Result<Quote>> + Send {
        (**self).fetch_quote(ticker)
    }
}

impl MarketData for SchwabClient {
    async fn fetch_option_chain(
        &self,
        ticker: &str,
        from_expiry: NaiveDate,
        to_expiry: NaiveDate,
    ) -> Result<ChainSnapshot> {
        let req = OptionChainRequest {
            symbol: ticker.to_owned(),
            from_date: from_expiry,
            to_date: to_expiry,
        };
        let resp = self.get_option_chain(&req).await?;
        tracing::debug!(
            ticker,
            status = resp.status.as_deref().unwrap_or("-"),
            contracts = resp.number_of_contracts.unwrap_or_default(),
            "option chain received"
        );
        Ok(resp.into())
    }

    async fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCandle>> {
        let req = PriceHistoryRequest {
            symbol: ticker.to_owned(),
            start_date: start,
            end_date: end,
        };
        let mut list = self.get_price_history_every_day(&req).await?;
        list.candles.sort_by_key(|c| c.datetime);
        Ok(list.candles.iter().map(DailyCandle::from).collect())
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<Quote> {
        let resp = self.get_quote(ticker).await?;
        quote_from_response(&resp, ticker)
    }
}

/// Pick `ticker`'s entry out of a quotes response, rounded to cents.
///
/// Entries for other symbols are never substituted.
pub(crate) fn quote_from_response(resp: &QuoteResponse, ticker: &str) -> Result<Quote> {
    let entry = resp.get(ticker).ok_or_else(|| {
        tracing::warn!(ticker, returned = resp.len(), "quote missing from response");
        OiError::QuoteUnavailable(ticker.to_owned())
    })?;
    let q = &entry.quote;
    Ok(Quote {
        open: round_cents(q.open_price),
        last: round_cents(q.last_price),
        high: round_cents(q.high_price),
        low: round_cents(q.low_price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> QuoteResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn quote_is_keyed_on_requested_symbol() {
        let resp = response(
            r#"{
                "QQQ": {"symbol": "QQQ", "quote": {
                    "openPrice": 1.0, "lastPrice": 1.0, "highPrice": 1.0, "lowPrice": 1.0}},
                "TQQQ": {"symbol": "TQQQ", "quote": {
                    "openPrice": 102.004, "lastPrice": 103.456, "highPrice": 106.0, "lowPrice": 98.999}}
            }"#,
        );
        let quote = quote_from_response(&resp, "TQQQ").unwrap();
        assert_eq!(
            quote,
            Quote { open: 102.0, last: 103.46, high: 106.0, low: 99.0 }
        );
    }

    #[test]
    fn missing_symbol_is_not_replaced_by_another() {
        let resp = response(
            r#"{"QQQ": {"symbol": "QQQ", "quote": {
                "openPrice": 1.0, "lastPrice": 1.0, "highPrice": 1.0, "lowPrice": 1.0}}}"#,
        );
        let err = quote_from_response(&resp, "TQQQ").unwrap_err();
        assert!(matches!(&err, OiError::QuoteUnavailable(t) if t == "TQQQ"), "{err:?}");
        assert!(err.is_provider_unavailable());

        let err = quote_from_response(&QuoteResponse::new(), "TQQQ").unwrap_err();
        assert!(matches!(err, OiError::QuoteUnavailable(_)));
    }
}
