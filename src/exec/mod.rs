// src/exec/mod.rs

//! Process supervision layer.
//!
//! This module launches the submitter with `tokio::process::Command`, drains
//! and scans its output, and decides the outcome of the run.
//!
//! - [`scanner`] forwards output lines to the log and detects accepted
//!   patterns.
//! - [`drain`] runs one scanner per output stream on its own task.
//! - [`watcher`] polls the external stop predicate.
//! - [`termination`] holds the kill switch and the caller's cancel hook.
//! - [`launcher`] abstracts process creation so tests can observe it.
//! - [`supervisor`] ties the above together and derives the [`RunOutcome`].

pub mod drain;
pub mod launcher;
pub mod match_state;
pub mod outcome;
pub mod request;
pub mod scanner;
pub mod supervisor;
pub mod termination;
pub mod watcher;

pub use drain::DrainTask;
pub use launcher::{ProcessLauncher, TokioLauncher};
pub use match_state::MatchState;
pub use outcome::{FailureKind, RunOutcome};
pub use request::{
    LinePattern, SubmissionRequest, DEFAULT_ACCEPTED_PATTERN, DEFAULT_POLL_INTERVAL,
    MIN_POLL_INTERVAL,
};
pub use scanner::{LineScanner, MatchListener, StreamKind};
pub use supervisor::{run, Supervisor, SupervisorState};
pub use termination::{CancelHandle, KillSwitch};
pub use watcher::{spawn_watcher, NeverStop, StopFlag, StopPredicate, WatcherExit};
