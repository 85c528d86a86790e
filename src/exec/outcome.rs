// src/exec/outcome.rs

//! Final result of a supervised submission.

use std::process::ExitStatus;

/// Why a run did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Pre-launch checks failed; no process was created.
    Validation,
    /// The process could not be created, or supervising it failed.
    Launch,
    /// The process ended with a non-zero code that no accepted line excused.
    AbnormalExit,
}

/// Exit code, success flag and error count handed back to the caller.
///
/// `run` never returns an error; every failure ends up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub succeeded: bool,
    pub error_count: u32,
    pub failure: Option<FailureKind>,
}

impl RunOutcome {
    /// Derive the outcome of a run whose process actually exited.
    ///
    /// In non-blocking mode a recorded match wins over the process's own exit
    /// code, since the submitter is usually killed right after the match.
    pub fn from_exit(blocking: bool, matched: bool, process_exit_code: i32) -> Self {
        let exit_code = effective_exit_code(blocking, matched, process_exit_code);
        let succeeded = exit_code == 0;
        Self {
            exit_code,
            succeeded,
            error_count: if succeeded { 0 } else { 1 },
            failure: (!succeeded).then_some(FailureKind::AbnormalExit),
        }
    }

    /// The request was rejected before launch. Nothing ran, so nothing is
    /// counted as an error.
    pub fn validation_failed() -> Self {
        Self::failed(FailureKind::Validation, 0)
    }

    pub fn launch_failed() -> Self {
        Self::failed(FailureKind::Launch, 1)
    }

    fn failed(kind: FailureKind, error_count: u32) -> Self {
        Self {
            exit_code: -1,
            succeeded: false,
            error_count,
            failure: Some(kind),
        }
    }
}

pub fn effective_exit_code(blocking: bool, matched: bool, process_exit_code: i32) -> i32 {
    if !blocking && matched {
        0
    } else {
        process_exit_code
    }
}

/// Integer exit code of a finished process.
///
/// Signal deaths on Unix map to `128 + signal`, like a shell reports them.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
