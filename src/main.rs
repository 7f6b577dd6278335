//! Application entry point for the `agro-health` service.
//!
//! This binary orchestrates the startup sequence for the farm health API:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `AGRO_BIND_ADDR` (optional) – listen address (default: `0.0.0.0:8080`)
//! - `ALERT_COOLDOWN_SECS` (optional) – live alert cooldown (default: 300)
//! - `ALERT_GROUPING` (optional) – `grouped` or `individual`
//! - `REPORT_MAX_READINGS` (optional) – per-request reading limit
//! - `AGRO_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AGRO_SPAN_EVENTS` (optional) – span event mode for tracing
use std::env;

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use agro_health::{config, routes};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let addr = cfg.bind_addr;

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(cfg);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `AGRO_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by `RUST_LOG`, falling back to `AGRO_LOG_LEVEL`
///   (see [`default_directives`] for the per-crate filter used then)
///
/// Call once at startup, before any logging macros run.
fn init_tracing() {
    // ---
    let span_events = match env::var("AGRO_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_directives(env::var("AGRO_LOG_LEVEL").ok().as_deref()))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

/// Filter directives used when `RUST_LOG` is unset.
///
/// `level` applies to this service. The HTTP stack underneath is held at
/// `warn`; axum extractor rejections are always logged.
fn default_directives(level: Option<&str>) -> String {
    // ---
    let level = match level {
        Some(l @ ("trace" | "debug" | "info" | "warn" | "error")) => l,
        _ => "debug",
    };
    format!("{level},hyper=warn,hyper_util=warn,tower=warn,axum::rejection=trace")
}
