//! Error types for the `oi-scope` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, OiError>`.
//!
//! [`OiError`] covers two families:
//! - **Provider errors** — API error bodies, unexpected HTTP statuses,
//!   transport failures, undecodable JSON and URL construction. These are the
//!   "provider unavailable" class: the refresh loop skips the tick and tries
//!   again on the next one.
//! - **Engine errors** — malformed chain data, insufficient candle history,
//!   and an empty strike set for the max-pain search.

use std::fmt;

/// A single entry of the `errors` array in a Schwab error response.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Error response returned by the Schwab Market Data API.
///
/// Auth failures come back as `{"message": ...}`, validation failures as
/// `{"errors": [...]}`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

impl ApiErrorBody {
    /// Whether the body carried anything recognisable.
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.errors.is_empty()
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            return write!(f, "{message}");
        }
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(
                f,
                "[{}] {}: {}",
                err.status.as_deref().unwrap_or("?"),
                err.title.as_deref().unwrap_or("Unknown Error"),
                err.detail.as_deref().unwrap_or("No detail"),
            )?;
        }
        if first {
            write!(f, "No message")?;
        }
        Ok(())
    }
}

/// All possible errors produced by the client and the analytics engine.
#[derive(Debug, thiserror::Error)]
pub enum OiError {
    /// An error response returned by the REST API.
    #[error("API error: {0}")]
    Api(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response body.
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The chain snapshot is structurally invalid (missing strike or open
    /// interest, empty contract list, negative or non-finite values).
    #[error("Malformed chain data: {0}")]
    MalformedChainData(String),

    /// The quotes response carried no entry for the requested symbol.
    #[error("Quote unavailable for {0}")]
    QuoteUnavailable(String),

    /// Fewer daily candles than the ADR window needs.
    #[error("Insufficient history: need {required} daily candles, got {available}")]
    InsufficientHistory {
        /// Candles the lookback window requires.
        required: usize,
        /// Candles actually supplied.
        available: usize,
    },

    /// Max pain is undefined for an empty strike set.
    #[error("Max pain unavailable: no strikes in chain")]
    MaxPainUnavailable,

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl OiError {
    /// `true` for failures of the data provider (transport, auth, status,
    /// undecodable payload, missing quote). These are recoverable by
    /// retrying next tick.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Api(_)
                | Self::HttpStatus { .. }
                | Self::Http(_)
                | Self::Json(_)
                | Self::Url(_)
                | Self::QuoteUnavailable(_)
        )
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedChainData(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OiError>;
