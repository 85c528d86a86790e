// src/exec/launcher.rs

//! Pluggable process creation.
//!
//! The supervisor creates its child through a `ProcessLauncher` instead of
//! calling `tokio::process::Command` directly. Production code uses
//! [`TokioLauncher`]; tests wrap it to count or refuse launches.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::exec::request::SubmissionRequest;

pub trait ProcessLauncher: Send + Sync {
    /// Start the submitter described by `request`.
    ///
    /// The returned child must have piped stdout and stderr.
    fn launch(&self, request: &SubmissionRequest) -> Result<Child>;
}

/// Launches the submitter with `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    fn launch(&self, request: &SubmissionRequest) -> Result<Child> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .envs(&request.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so termination reaches everything the submitter
        // script forks.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd.spawn()
            .with_context(|| format!("spawning submitter process {:?}", request.program))
    }
}
