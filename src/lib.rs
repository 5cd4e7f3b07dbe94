//! # oi-scope
//!
//! Live open-interest view of an options chain: open interest by strike,
//! the max-pain strike, put/call ratio and average-daily-range bands,
//! refreshed on a fixed interval from the
//! [Schwab Market Data API](https://developer.schwab.com/).
//!
//! The analytics in [`analytics`] are pure functions of a chain snapshot;
//! [`session::Session`] owns everything that persists across refreshes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::Local;
//! use oi_scope::{SchwabClient, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> oi_scope::Result<()> {
//!     let today = Local::now().date_naive();
//!     let client = SchwabClient::new("your-access-token")?;
//!     let config = SessionConfig::for_date(today).ticker("TQQQ");
//!
//!     let mut session = Session::start(client, config, today).await?;
//!     let report = session.tick().await?;
//!     println!("max pain: {:?}", report.analysis.max_pain);
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod chart;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod provider;
pub mod session;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::SchwabClient;
/// Re-export the session types.
pub use config::SessionConfig;
pub use session::{Session, TickReport};
/// Re-export the error type and Result alias.
pub use error::{OiError, Result};
