//! Option Chain endpoint — full chain for a range of expirations.

use crate::client::SchwabClient;
use crate::error::Result;
use crate::types::option_chain::*;

impl SchwabClient {
    /// Retrieve the option chain for an underlying, both calls and puts,
    /// for expirations between `from_date` and `to_date`.
    ///
    /// **Endpoint:** `GET /chains`
    pub async fn get_option_chain(&self, req: &OptionChainRequest) -> Result<OptionChainResponse> {
        self.get("/chains", &req.query()).await
    }
}
