// src/exec/match_state.rs

//! Shared "accepted line seen" flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic flag recording whether an accepted pattern has been observed on
/// either output stream of the submitter.
///
/// Shared by both drain tasks and read by the supervisor once the process has
/// exited. Once found, it stays found for the rest of the run.
#[derive(Debug, Default)]
pub struct MatchState {
    found: AtomicBool,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the state as found.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// callers can use it to run one-shot side effects.
    pub fn record(&self) -> bool {
        self.found
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }
}
