// src/config/validate.rs

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::model::{
    parse_duration, JobFile, JobSection, RawJobFile, SupervisorSection, SupervisorSettings,
};
use crate::config::variables::VariableSpace;
use crate::errors::{Result, SubmitError};
use crate::exec::request::{LinePattern, SubmissionRequest};
use crate::fs::FileSystem;

impl TryFrom<RawJobFile> for JobFile {
    type Error = SubmitError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        let supervisor = parse_supervisor_section(&raw.supervisor)?;
        Ok(JobFile::new_unchecked(
            raw.job,
            supervisor,
            raw.variables,
            raw.supervisor,
        ))
    }
}

fn parse_supervisor_section(section: &SupervisorSection) -> Result<SupervisorSettings> {
    let poll_interval = parse_duration(&section.poll_interval)?;
    if poll_interval.is_zero() {
        return Err(SubmitError::ConfigError(
            "[supervisor].poll_interval must be greater than zero".to_string(),
        ));
    }

    let mut patterns = Vec::new();
    for s in &section.accepted_patterns {
        if s.is_empty() {
            return Err(SubmitError::ConfigError(
                "[supervisor].accepted_patterns must not contain empty strings".to_string(),
            ));
        }
        patterns.push(LinePattern::substring(s.clone()));
    }
    for s in &section.accepted_regexes {
        patterns.push(LinePattern::regex(s)?);
    }

    Ok(SupervisorSettings {
        poll_interval,
        patterns,
    })
}

/// A reason a submission must not be launched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("path to the submit utility is empty")]
    ProgramBlank,

    #[error("submit utility {0:?} does not exist or is not a file")]
    ProgramMissing(PathBuf),

    #[error("master URL is empty")]
    MasterBlank,

    #[error("application jar path is empty")]
    ApplicationBlank,
}

/// Pre-launch checks on a resolved request.
///
/// Returns every violation found; an empty list means the request may be
/// launched.
pub fn validate_request(request: &SubmissionRequest, fs: &dyn FileSystem) -> Vec<Violation> {
    let mut violations = Vec::new();

    if is_blank_path(&request.program) {
        violations.push(Violation::ProgramBlank);
    } else if !fs.is_file(&request.program) {
        violations.push(Violation::ProgramMissing(request.program.clone()));
    }

    if is_blank(&request.master) {
        violations.push(Violation::MasterBlank);
    }

    if is_blank(&request.application) {
        violations.push(Violation::ApplicationBlank);
    }

    violations
}

/// One finding of [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remark {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check that the minimum options of a job have been provided.
///
/// Stricter than [`validate_request`]: the main class is required here too.
/// Meant for editors and `--check`, not as a launch gate.
pub fn check(job: &JobSection, vars: &VariableSpace, fs: &dyn FileSystem) -> Vec<Remark> {
    let mut remarks = Vec::new();

    if is_blank(&job.script_path) {
        remarks.push(remark("script_path", "must not be blank"));
    } else {
        let resolved = vars.substitute(&job.script_path);
        if !fs.exists(Path::new(&resolved)) {
            remarks.push(remark("script_path", format!("file {resolved:?} does not exist")));
        }
    }

    if is_blank(&job.master) {
        remarks.push(remark("master", "must not be blank"));
    }

    if is_blank(&job.jar) {
        remarks.push(remark("jar", "must not be blank"));
    }

    if job.class_name.as_deref().is_none_or(is_blank) {
        remarks.push(remark("class_name", "must not be blank"));
    }

    remarks
}

fn remark(field: &'static str, message: impl Into<String>) -> Remark {
    Remark {
        field,
        message: message.into(),
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_blank_path(p: &Path) -> bool {
    p.as_os_str().to_string_lossy().trim().is_empty()
}
