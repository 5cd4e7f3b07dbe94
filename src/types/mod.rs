//! Request and response types for the Schwab Market Data API.
//!
//! ## Organization
//!
//! - [`option_chain`] — Option chain request and the nested date/strike maps
//! - [`price_history`] — Daily candle request and response
//! - [`quotes`] — Underlying quote snapshot

pub mod option_chain;
pub mod price_history;
pub mod quotes;
