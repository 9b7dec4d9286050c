//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive runs log only to `--log-file` (or not
//! at all). Headless runs log to stderr and keep stdout for results.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "soccercloud_dashboard=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    match (log_file, interactive) {
        (Some(path), _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter())
                .try_init()
                .map_err(|e| anyhow!("install log subscriber: {e}"))
        }
        (None, true) => Ok(()),
        (None, false) => tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter())
            .try_init()
            .map_err(|e| anyhow!("install log subscriber: {e}")),
    }
}
