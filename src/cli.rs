// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `submitwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "submitwatch",
    version,
    about = "Submit a batch job (e.g. spark-submit) and supervise the submitter until the job is accepted or finished.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (TOML).
    ///
    /// Default: `Submit.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Submit.toml")]
    pub config: PathBuf,

    /// Set a job variable, overriding `[variables]` (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SUBMITWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the submit command, but don't run it.
    #[arg(long)]
    pub dry_run: bool,

    /// Report missing or invalid job fields and exit.
    #[arg(long)]
    pub check: bool,

    /// Return as soon as the job is accepted instead of waiting for the
    /// submitter to exit. Overrides `block_execution` from the job file.
    #[arg(long)]
    pub no_block: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
