//! Price History endpoint — daily candles.

use crate::client::SchwabClient;
use crate::error::Result;
use crate::types::price_history::*;

impl SchwabClient {
    /// Retrieve one candle per trading day between the request's start and
    /// end dates.
    ///
    /// Non-trading days inside the window are simply absent from the result.
    ///
    /// **Endpoint:** `GET /pricehistory`
    pub async fn get_price_history_every_day(&self, req: &PriceHistoryRequest) -> Result<CandleList> {
        self.get("/pricehistory", &req.query()).await
    }
}
