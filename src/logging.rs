// src/logging.rs

//! `tracing` subscriber for the `submitwatch` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`
//! 2. `SUBMITWATCH_LOG`, either a bare level ("debug") or full directives
//!    ("info,submitwatch::exec=trace")
//! 3. `info`
//!
//! Everything is written to STDERR. Submitter output is forwarded through
//! the same subscriber (stdout lines at INFO, stderr lines at ERROR), and
//! STDOUT is reserved for `--dry-run` / `--check` reports.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "SUBMITWATCH_LOG";

impl From<LogLevel> for LevelFilter {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = resolve_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("initialising logging")?;

    Ok(())
}

/// Build the filter from the CLI flag and the raw env value.
///
/// An env value that does not parse as directives falls back to `info`.
pub fn resolve_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::builder()
            .with_default_directive(LevelFilter::from(lvl).into())
            .parse_lossy("");
    }

    env_value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
