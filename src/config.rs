//! Session configuration.
//!
//! [`SessionConfig`] holds everything the refresh loop needs besides the
//! provider. It can be built field by field, through the builder-style
//! setters, or from `OI_*` environment variables.

use std::env;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::constants::defaults;
use crate::error::{OiError, Result};

/// The expiration a weekly-options watcher wants by default: `date` itself if
/// it is a Friday, otherwise the next Friday after it.
pub fn next_friday(date: NaiveDate) -> NaiveDate {
    let today = date.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    let ahead = (friday + 7 - today) % 7;
    date + Days::new(u64::from(ahead))
}

/// Configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Underlying symbol, upper-cased.
    pub ticker: String,
    /// Expiration whose chain is watched.
    pub expiry: NaiveDate,
    /// Visible strike span either side of the startup last price.
    pub span: f64,
    /// Delay between refresh ticks.
    pub refresh_interval: Duration,
    /// ADR lookback in trading days.
    pub adr_days: usize,
    /// Overlay the prior session's OHLC levels on the chart.
    pub show_prior_session: bool,
}

impl SessionConfig {
    /// Defaults for a session started on `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            ticker: defaults::TICKER.to_owned(),
            expiry: next_friday(today),
            span: defaults::SPAN,
            refresh_interval: Duration::from_millis(defaults::REFRESH_INTERVAL_MS),
            adr_days: defaults::ADR_DAYS,
            show_prior_session: false,
        }
    }

    /// Read overrides from the environment on top of [`Self::for_date`].
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `OI_TICKER` | `TQQQ` |
    /// | `OI_EXPIRY` | next Friday (`YYYY-MM-DD`) |
    /// | `OI_SPAN` | `20` |
    /// | `OI_REFRESH_MS` | `5000` |
    /// | `OI_ADR_DAYS` | `5` |
    /// | `OI_SHOW_PRIOR_SESSION` | `false` |
    ///
    /// Unset or blank variables keep their default; set but unparseable ones
    /// are an error.
    pub fn from_env(today: NaiveDate) -> Result<Self> {
        let mut config = Self::for_date(today);

        if let Some(ticker) = env_var("OI_TICKER") {
            config = config.ticker(ticker);
        }
        if let Some(expiry) = env_var("OI_EXPIRY") {
            config.expiry = NaiveDate::parse_from_str(&expiry, "%Y-%m-%d").map_err(|e| {
                OiError::InvalidArgument(format!("OI_EXPIRY={expiry:?}: {e}"))
            })?;
        }
        if let Some(span) = env_parse::<f64>("OI_SPAN")? {
            config.span = span;
        }
        if let Some(ms) = env_parse::<u64>("OI_REFRESH_MS")? {
            config.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(days) = env_parse::<usize>("OI_ADR_DAYS")? {
            config.adr_days = days;
        }
        if let Some(flag) = env_var("OI_SHOW_PRIOR_SESSION") {
            config.show_prior_session = parse_bool(&flag);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the ticker (upper-cased). Default: `TQQQ`.
    pub fn ticker(mut self, ticker: impl AsRef<str>) -> Self {
        self.ticker = ticker.as_ref().trim().to_uppercase();
        self
    }

    /// Set the expiry. Default: next Friday.
    pub fn expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = expiry;
        self
    }

    /// Set the visible span. Default: 20.
    pub fn span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    /// Set the refresh interval in milliseconds. Default: 5,000.
    pub fn refresh_interval_ms(mut self, ms: u64) -> Self {
        self.refresh_interval = Duration::from_millis(ms);
        self
    }

    /// Set the ADR lookback in trading days. Default: 5.
    pub fn adr_days(mut self, days: usize) -> Self {
        self.adr_days = days;
        self
    }

    /// Enable or disable the prior-session overlay. Default: false.
    pub fn show_prior_session(mut self, enable: bool) -> Self {
        self.show_prior_session = enable;
        self
    }

    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.is_empty() {
            return Err(OiError::InvalidArgument("ticker must not be empty".into()));
        }
        if !self.span.is_finite() || self.span <= 0.0 {
            return Err(OiError::InvalidArgument(format!("span must be positive, got {}", self.span)));
        }
        if self.refresh_interval.is_zero() {
            return Err(OiError::InvalidArgument("refresh interval must be non-zero".into()));
        }
        if self.adr_days == 0 || self.adr_days > defaults::MAX_ADR_DAYS {
            return Err(OiError::InvalidArgument(format!(
                "ADR window must be 1..={} days, got {}",
                defaults::MAX_ADR_DAYS,
                self.adr_days
            )));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| OiError::InvalidArgument(format!("{name}={raw:?}: {e}")))
        })
        .transpose()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on")
}
