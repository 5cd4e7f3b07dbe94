//! Constants for the Schwab Market Data API and the session defaults.
//!
//! The URL constants are used internally by
//! [`SchwabClient`](crate::client::SchwabClient); the defaults back
//! [`SessionConfig`](crate::config::SessionConfig) and the analytics engine.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the Schwab Market Data REST API.
pub const API_BASE_URL: &str = "https://api.schwabapi.com/marketdata/v1";

// ---------------------------------------------------------------------------
// Session defaults
// ---------------------------------------------------------------------------

/// Defaults for the refresh session.
pub mod defaults {
    /// Underlying symbol watched when none is configured.
    pub const TICKER: &str = "TQQQ";
    /// Visible strike span either side of the last price.
    pub const SPAN: f64 = 20.0;
    /// Refresh interval of the session loop (milliseconds).
    pub const REFRESH_INTERVAL_MS: u64 = 5_000;
    /// ADR lookback window in trading days.
    pub const ADR_DAYS: usize = 5;
    /// Longest accepted ADR lookback (about one trading year).
    pub const MAX_ADR_DAYS: usize = 252;
    /// Lower bound of the default strike range.
    pub const LOWER_STRIKE: f64 = 0.0;
    /// Upper bound of the default strike range.
    pub const UPPER_STRIKE: f64 = 10_000.0;
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// Layout constants for the chart frame.
pub mod chart {
    /// Headroom added above the tallest visible bar.
    pub const Y_HEADROOM: f64 = 0.1;
    /// Right edge of the "above today's high" shaded region.
    pub const SHADE_CEILING: f64 = 1e6;
    /// Width in characters of the longest bar in the text renderer.
    pub const TEXT_BAR_WIDTH: usize = 40;
}
