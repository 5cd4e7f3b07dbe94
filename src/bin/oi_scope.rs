//! Live open-interest chart in the terminal.
//!
//! Starts a session for the configured ticker and redraws the text chart on
//! every refresh until Ctrl-C.
//!
//! # Usage
//!
//! ```sh
//! export SCHWAB_ACCESS_TOKEN="your-access-token"
//! export OI_TICKER=TQQQ            # optional, see SessionConfig::from_env
//! cargo run --bin oi_scope --features cli
//! ```

use std::env;

use chrono::Local;
use oi_scope::chart::render_text;
use oi_scope::{SchwabClient, Session, SessionConfig};

#[tokio::main]
async fn main() -> oi_scope::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let access_token =
        env::var("SCHWAB_ACCESS_TOKEN").expect("set SCHWAB_ACCESS_TOKEN env var before running");
    let client = match env::var("SCHWAB_BASE_URL") {
        Ok(base_url) => SchwabClient::with_base_url(access_token, base_url)?,
        Err(_) => SchwabClient::new(access_token)?,
    };

    let today = Local::now().date_naive();
    let config = SessionConfig::from_env(today)?;

    println!(
        "Watching {} expiring {} (refresh every {} ms)…",
        config.ticker,
        config.expiry,
        config.refresh_interval.as_millis()
    );

    let mut session = Session::start(client, config, today).await?;
    println!(
        "ADR({}) = {:.2}, window {:.2}–{:.2}\n",
        session.config().adr_days,
        session.adr(),
        session.window().lower,
        session.window().upper
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Error: cannot listen for Ctrl-C: {e}");
        }
    };

    session
        .run(
            |session, report| {
                if let Some(frame) = session.frame() {
                    println!("{}", render_text(&frame, &report.analysis.rows));
                }
            },
            shutdown,
        )
        .await?;

    println!("Done.");
    Ok(())
}
