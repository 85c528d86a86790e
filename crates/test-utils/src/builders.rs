#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use submitwatch::config::{JobFile, JobSection, RawJobFile, SupervisorSection};
use submitwatch::exec::{LinePattern, SubmissionRequest};

/// Builder for `SubmissionRequest` with test-friendly defaults:
/// non-blank master and application, and a short poll interval.
pub struct RequestBuilder {
    request: SubmissionRequest,
}

impl RequestBuilder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let mut request = SubmissionRequest::new(program);
        request.master = "local[*]".to_string();
        request.application = "app.jar".to_string();
        request.poll_interval = Duration::from_millis(50);
        Self { request }
    }

    /// `/bin/sh <script>`.
    pub fn shell_script(script: &Path) -> Self {
        Self::new("/bin/sh").arg(&script.display().to_string())
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.request.args.push(arg.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.request.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn blocking(mut self, val: bool) -> Self {
        self.request.blocking = val;
        self
    }

    /// Replace the default patterns with a single substring.
    pub fn pattern(mut self, s: &str) -> Self {
        self.request.patterns = vec![LinePattern::substring(s)];
        self
    }

    pub fn regex(mut self, s: &str) -> Self {
        self.request
            .patterns
            .push(LinePattern::regex(s).expect("test regex must compile"));
        self
    }

    pub fn master(mut self, s: &str) -> Self {
        self.request.master = s.to_string();
        self
    }

    pub fn application(mut self, s: &str) -> Self {
        self.request.application = s.to_string();
        self
    }

    pub fn poll_interval(mut self, d: Duration) -> Self {
        self.request.poll_interval = d;
        self
    }

    pub fn build(self) -> SubmissionRequest {
        self.request
    }
}

/// Builder for job files.
pub struct JobFileBuilder {
    raw: RawJobFile,
}

impl JobFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawJobFile {
                job: JobSection::default(),
                supervisor: SupervisorSection::default(),
                variables: BTreeMap::new(),
            },
        }
    }

    pub fn script_path(mut self, s: &str) -> Self {
        self.raw.job.script_path = s.to_string();
        self
    }

    pub fn master(mut self, s: &str) -> Self {
        self.raw.job.master = s.to_string();
        self
    }

    pub fn jar(mut self, s: &str) -> Self {
        self.raw.job.jar = s.to_string();
        self
    }

    pub fn class_name(mut self, s: &str) -> Self {
        self.raw.job.class_name = Some(s.to_string());
        self
    }

    pub fn args(mut self, s: &str) -> Self {
        self.raw.job.args = Some(s.to_string());
        self
    }

    pub fn conf(mut self, s: &str) -> Self {
        self.raw.job.conf.push(s.to_string());
        self
    }

    pub fn driver_memory(mut self, s: &str) -> Self {
        self.raw.job.driver_memory = Some(s.to_string());
        self
    }

    pub fn executor_memory(mut self, s: &str) -> Self {
        self.raw.job.executor_memory = Some(s.to_string());
        self
    }

    pub fn block_execution(mut self, val: bool) -> Self {
        self.raw.job.block_execution = val;
        self
    }

    pub fn poll_interval(mut self, s: &str) -> Self {
        self.raw.supervisor.poll_interval = s.to_string();
        self
    }

    pub fn accepted_pattern(mut self, s: &str) -> Self {
        self.raw.supervisor.accepted_patterns = vec![s.to_string()];
        self
    }

    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.raw.variables.insert(name.to_string(), value.to_string());
        self
    }

    pub fn raw(self) -> RawJobFile {
        self.raw
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.raw).expect("Failed to build valid job file from builder")
    }
}

impl Default for JobFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
