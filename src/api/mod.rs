//! REST API endpoint implementations.
//!
//! Each sub-module adds `async` methods to
//! [`SchwabClient`](crate::client::SchwabClient) via `impl` blocks. All
//! methods handle query encoding, HTTP transport, and error mapping.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use oi_scope::SchwabClient;
//! use oi_scope::types::option_chain::OptionChainRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> oi_scope::Result<()> {
//! let client = SchwabClient::new("token")?;
//! let expiry = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
//! let chain = client
//!     .get_option_chain(&OptionChainRequest::single_expiry("TQQQ", expiry))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! | Module | Endpoint | Description |
//! |---|---|---|
//! | [`option_chain`] | `GET /chains` | Calls and puts by expiration and strike |
//! | [`price_history`] | `GET /pricehistory` | Daily candles |
//! | [`quotes`] | `GET /{symbol}/quotes` | Underlying quote |

pub mod option_chain;
pub mod price_history;
pub mod quotes;
