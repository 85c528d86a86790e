// src/exec/request.rs

//! Resolved inputs of one supervised submission.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use crate::errors::{Result, SubmitError};

/// How often the cancellation watcher polls the stop predicate by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest interval the cancellation watcher will actually sleep between
/// polls; smaller values, including zero, are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Output fragment printed by `spark-submit` once YARN accepted the job.
pub const DEFAULT_ACCEPTED_PATTERN: &str = "tracking URL:";

/// A recognized "job accepted" marker in the submitter's output.
#[derive(Debug, Clone)]
pub enum LinePattern {
    /// Matches when the line contains the string anywhere.
    Substring(String),
    /// Matches when the regex finds a match anywhere in the line.
    Regex(Regex),
}

impl LinePattern {
    pub fn substring(s: impl Into<String>) -> Self {
        LinePattern::Substring(s.into())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(LinePattern::Regex)
            .map_err(|source| SubmitError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            LinePattern::Substring(s) => line.contains(s.as_str()),
            LinePattern::Regex(re) => re.is_match(line),
        }
    }

    /// Source text of the pattern, as configured.
    pub fn as_str(&self) -> &str {
        match self {
            LinePattern::Substring(s) => s,
            LinePattern::Regex(re) => re.as_str(),
        }
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the supervisor needs to launch and judge one submission.
///
/// Built by [`crate::config::command::build_request`] from a job file, or
/// directly by library callers. The supervisor only ever borrows it.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// Submitter executable (e.g. the `spark-submit` script).
    pub program: PathBuf,
    /// Arguments passed after the executable, in order.
    pub args: Vec<String>,
    /// Variables exported into the child's environment on top of the
    /// inherited one.
    pub env: BTreeMap<String, String>,
    /// Wait for the process to exit (`true`) or treat the first accepted
    /// line as success and stop the submitter (`false`).
    pub blocking: bool,
    /// Markers that signal the remote job was accepted.
    pub patterns: Vec<LinePattern>,
    /// Cluster / master designation the job is submitted to.
    pub master: String,
    /// Application artifact (jar) being submitted.
    pub application: String,
    /// Polling interval of the cancellation watcher. Values below
    /// [`MIN_POLL_INTERVAL`] are clamped up to it.
    pub poll_interval: Duration,
}

impl SubmissionRequest {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            blocking: true,
            patterns: vec![LinePattern::substring(DEFAULT_ACCEPTED_PATTERN)],
            master: String::new(),
            application: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Full command line, executable first.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
