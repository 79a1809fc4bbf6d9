//! Structured logging setup.
//!
//! This crate is a library with no host process of its own, so
//! `init_logging` is an opt-in convenience the embedding application may
//! call once at startup; the engine itself only ever emits `tracing`
//! events and never installs a subscriber on its own.

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr `tracing` subscriber honoring `RUST_LOG`, defaulting
/// to `info` when unset.
///
/// # Errors
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already initialized: {e}"))?;

    info!("logging initialized");
    Ok(())
}

/// Logs an error with context.
pub fn log_error(context: &str, err: &dyn std::error::Error) {
    error!(context = context, error = %err, "error occurred");
}

/// Log an informational message.
pub fn log_info(message: &str) {
    info!(message = message);
}
