//! Refresh orchestrator.
//!
//! A [`Session`] is the explicit context a live chart runs on: it owns the
//! provider handle, the configuration, the ADR and prior-session candle
//! computed once at startup, the visible strike window, and the most recent
//! successful [`TickReport`].
//!
//! # Lifecycle
//!
//! ```text
//!   Session::start ── daily candles ─▶ ADR (fatal if history is short)
//!                  └─ quote ─────────▶ window = last ± span
//!
//!   every refresh_interval:
//!     tick ── chain + quote ─▶ analytics::analyze ─▶ Arc<TickReport>
//!       provider / data failure → tick skipped, previous report kept
//! ```
//!
//! Reports are published as `Arc`s; a click handler holding one keeps
//! reading a consistent snapshot while the next tick is computed.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tokio::time::{self, MissedTickBehavior};

use crate::analytics::{
    Analysis, DailyCandle, StrikeRange, analyze, average_daily_range, history_window,
};
use crate::chart::{ChartFrame, FrameContext};
use crate::config::SessionConfig;
use crate::error::{OiError, Result};
use crate::provider::{MarketData, Quote};

/// Output of one successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub analysis: Analysis,
    pub quote: Quote,
    pub updated_at: DateTime<Local>,
}

/// Live state of one watched chain.
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    config: SessionConfig,
    adr: f64,
    prior_session: Option<DailyCandle>,
    window: StrikeRange,
    latest: Option<Arc<TickReport>>,
    ticks: u64,
    skipped_ticks: u64,
}

impl<P: MarketData> Session<P> {
    /// Compute the startup state.
    ///
    /// Fetches `2 × adr_days` calendar days of daily candles ending the day
    /// before `today` and derives the ADR from them, then fetches a quote to
    /// centre the visible window on the last price.
    ///
    /// # Errors
    ///
    /// Any provider error, and [`OiError::InsufficientHistory`] when the
    /// history holds fewer than `adr_days` candles. All are fatal: a session
    /// without an ADR is not started.
    pub async fn start(provider: P, config: SessionConfig, today: NaiveDate) -> Result<Self> {
        config.validate()?;

        let (start, end) = history_window(today, config.adr_days)?;
        let candles = provider
            .fetch_daily_candles(&config.ticker, start, end)
            .await?;
        let adr = average_daily_range(&candles, config.adr_days).inspect_err(|e| {
            tracing::error!(ticker = %config.ticker, %start, %end, error = %e, "cannot compute ADR");
        })?;
        let prior_session = candles.last().copied();

        let quote = provider.fetch_quote(&config.ticker).await?;
        let window = StrikeRange::around(quote.last, config.span)?;

        tracing::info!(
            ticker = %config.ticker,
            expiry = %config.expiry,
            adr,
            lower = window.lower,
            upper = window.upper,
            "session started"
        );

        Ok(Self {
            provider,
            config,
            adr,
            prior_session,
            window,
            latest: None,
            ticks: 0,
            skipped_ticks: 0,
        })
    }

    /// Fetch a fresh chain and quote and recompute everything.
    ///
    /// On error the previously published report stays in place.
    pub async fn tick(&mut self) -> Result<Arc<TickReport>> {
        let ticker = &self.config.ticker;
        let expiry = self.config.expiry;

        let snapshot = self
            .provider
            .fetch_option_chain(ticker, expiry, expiry)
            .await?;
        let quote = self.provider.fetch_quote(ticker).await?;
        let analysis = analyze(&snapshot, self.window, quote.open, self.adr)?;

        tracing::debug!(
            %ticker,
            strikes = analysis.rows.len(),
            total_calls = analysis.stats.total_calls,
            total_puts = analysis.stats.total_puts,
            max_pain = ?analysis.max_pain,
            last = quote.last,
            "tick computed"
        );

        let report = Arc::new(TickReport {
            analysis,
            quote,
            updated_at: Local::now(),
        });
        self.latest = Some(Arc::clone(&report));
        self.ticks += 1;
        Ok(report)
    }

    /// Tick every `refresh_interval` until `shutdown` resolves.
    ///
    /// The first tick fires immediately. Ticks that overrun the interval
    /// cause the missed ticks to be skipped rather than queued. Provider
    /// failures and malformed chains are logged and skipped; any other error
    /// ends the loop.
    pub async fn run<F, S>(&mut self, mut on_tick: F, shutdown: S) -> Result<()>
    where
        F: FnMut(&Self, &TickReport),
        S: Future<Output = ()>,
    {
        let mut interval = time::interval(self.config.refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(ticks = self.ticks, skipped = self.skipped_ticks, "session stopped");
                    return Ok(());
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(report) => on_tick(self, &report),
                        Err(e) if is_recoverable(&e) => {
                            self.skipped_ticks += 1;
                            tracing::warn!(error = %e, "tick skipped; keeping previous report");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "session aborted");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}

impl<P> Session<P> {
    /// The most recent successful report, if any.
    pub fn latest(&self) -> Option<Arc<TickReport>> {
        self.latest.clone()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Average daily range computed at startup.
    pub fn adr(&self) -> f64 {
        self.adr
    }

    /// Visible strike window computed at startup.
    pub fn window(&self) -> StrikeRange {
        self.window
    }

    /// Most recent completed session before startup.
    pub fn prior_session(&self) -> Option<DailyCandle> {
        self.prior_session
    }

    /// Successful ticks so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks dropped because of provider or data failures.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    /// Inputs the chart needs besides a report.
    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            ticker: self.config.ticker.clone(),
            expiry: self.config.expiry,
            window: self.window,
            prior_session: self.config.show_prior_session.then_some(self.prior_session).flatten(),
        }
    }

    /// Chart frame for the latest report.
    pub fn frame(&self) -> Option<ChartFrame> {
        let report = self.latest.as_ref()?;
        Some(ChartFrame::build(report, &self.frame_context()))
    }
}

fn is_recoverable(err: &OiError) -> bool {
    err.is_provider_unavailable() || matches!(err, OiError::MalformedChainData(_))
}
