//! Core HTTP client for the Schwab Market Data REST API.
//!
//! The [`SchwabClient`] struct is the entry point for the market-data
//! endpoints this crate uses. It wraps [`reqwest::Client`] with the bearer
//! token header and provides a typed `get` with query parameters.
//!
//! Endpoint methods are added to `SchwabClient` via `impl` blocks in the
//! [`crate::api`] module. Token issuance and refresh happen elsewhere; the
//! client only carries an already-issued access token.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::constants::API_BASE_URL;
use crate::error::{ApiErrorBody, OiError, Result};

/// Core HTTP client for the Schwab Market Data API.
///
/// The `Authorization` header value is built once at construction time and
/// reused for every request.
///
/// # Example
///
/// ```no_run
/// use oi_scope::client::SchwabClient;
///
/// # #[tokio::main]
/// # async fn main() -> oi_scope::error::Result<()> {
/// let client = SchwabClient::new("your-access-token")?;
/// let quote = client.get_quote("TQQQ").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SchwabClient {
    http: reqwest::Client,
    /// OAuth bearer token.
    access_token: String,
    /// Base URL for REST requests (defaults to [`API_BASE_URL`]).
    base_url: String,
    /// Pre-built `Bearer <token>` header value.
    auth_header: HeaderValue,
}

impl SchwabClient {
    /// Create a new `SchwabClient` with the given access token.
    ///
    /// Uses the default API base URL.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(access_token, API_BASE_URL)
    }

    /// Create a new `SchwabClient` pointing at a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .build()?;

        let access_token = access_token.into();
        let auth_header = Self::bearer(&access_token)?;

        Ok(Self {
            http,
            access_token,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            auth_header,
        })
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Replace the access token (e.g. after an external refresh).
    pub fn set_access_token(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.auth_header = Self::bearer(&token)?;
        self.access_token = token;
        Ok(())
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request with query parameters and deserialize the JSON
    /// response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R> {
        let url = self.url(path, query)?;
        tracing::debug!(%url, "GET");

        let resp = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, self.auth_header.clone())
            .send()
            .await?;

        self.handle_response(resp).await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Build the full URL from a path segment and query pairs.
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let raw = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let mut url = Url::parse(&raw)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn bearer(token: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            OiError::InvalidArgument("access token contains invalid header characters".into())
        })
    }

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Read a response, returning either the deserialized body or an `OiError`.
    async fn handle_response<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(OiError::Json)
        } else {
            let body = String::from_utf8_lossy(&bytes);
            Err(parse_error_body(status, &body))
        }
    }
}

/// Try to parse the API's JSON error structure; fall back to a raw HTTP
/// status error.
pub(crate) fn parse_error_body(status: reqwest::StatusCode, body: &str) -> OiError {
    if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(body) {
        if !api_err.is_empty() {
            return OiError::Api(api_err);
        }
    }
    OiError::HttpStatus {
        status,
        body: body.to_owned(),
    }
}
