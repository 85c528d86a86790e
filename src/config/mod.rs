// src/config/mod.rs

//! Job configuration for submitwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed job model (`model.rs`).
//! - Load and save job files (`loader.rs`).
//! - Resolve `${NAME}` placeholders (`variables.rs`).
//! - Build the submit command line and request (`command.rs`).
//! - Pre-launch validation and `check` remarks (`validate.rs`).

pub mod command;
pub mod loader;
pub mod model;
pub mod validate;
pub mod variables;

pub use command::{build_command, build_request};
pub use loader::{load_and_validate, load_from_path, save_to_path};
pub use model::{
    parse_duration, JobFile, JobSection, RawJobFile, SupervisorSection, SupervisorSettings,
};
pub use validate::{check, validate_request, Remark, Violation};
pub use variables::VariableSpace;
