// src/errors.rs

//! Crate-wide error type for configuration and I/O around the supervisor.
//!
//! The supervisor itself never returns these; it reports through
//! [`crate::exec::RunOutcome`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid output pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SubmitError>;
