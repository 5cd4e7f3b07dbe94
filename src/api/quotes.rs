//! Quotes endpoint — single-symbol snapshot.

use crate::client::SchwabClient;
use crate::error::Result;
use crate::types::quotes::*;

impl SchwabClient {
    /// Retrieve the current quote for one symbol.
    ///
    /// **Endpoint:** `GET /{symbol}/quotes`
    pub async fn get_quote(&self, symbol: &str) -> Result<QuoteResponse> {
        self.get(&format!("/{symbol}/quotes"), &[]).await
    }
}
