// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SubmitError};
use crate::exec::request::{LinePattern, DEFAULT_ACCEPTED_PATTERN, DEFAULT_POLL_INTERVAL};

/// Job file as read from (or written to) TOML.
///
/// ```toml
/// [job]
/// script_path = "/opt/spark/bin/spark-submit"
/// master = "yarn-cluster"
/// jar = "/jobs/wordcount.jar"
/// class_name = "org.example.WordCount"
/// args = "in.txt out"
/// conf = ["spark.yarn.queue=etl"]
/// block_execution = false
///
/// [supervisor]
/// poll_interval = "5s"
/// accepted_patterns = ["tracking URL:"]
///
/// [variables]
/// SPARK_HOME = "/opt/spark"
/// ```
///
/// All sections are optional and have defaults. Use [`JobFile`] for the
/// checked form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJobFile {
    #[serde(default)]
    pub job: JobSection,

    #[serde(default)]
    pub supervisor: SupervisorSection,

    /// Variables available for `${NAME}` substitution and exported to the
    /// submitter's environment.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// `[job]` section: what to submit and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSection {
    /// Path of the `spark-submit` utility.
    #[serde(default)]
    pub script_path: String,

    /// Master URL, `yarn-cluster` unless configured.
    #[serde(default = "default_master")]
    pub master: String,

    /// Application jar. Used verbatim, no variable substitution.
    #[serde(default)]
    pub jar: String,

    /// Main class of the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Space-separated application arguments, e.g. `"http.log 1000"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,

    /// `key=value` pairs passed as repeated `--conf`.
    #[serde(default)]
    pub conf: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_memory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_memory: Option<String>,

    /// Wait for the submitter to exit instead of returning once the job was
    /// accepted.
    #[serde(default = "default_block_execution")]
    pub block_execution: bool,
}

fn default_master() -> String {
    "yarn-cluster".to_string()
}

fn default_block_execution() -> bool {
    true
}

impl Default for JobSection {
    fn default() -> Self {
        Self {
            script_path: String::new(),
            master: default_master(),
            jar: String::new(),
            class_name: None,
            args: None,
            conf: Vec::new(),
            driver_memory: None,
            executor_memory: None,
            block_execution: default_block_execution(),
        }
    }
}

/// `[supervisor]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorSection {
    /// Duration string such as `"5s"` or `"250ms"`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Substrings that mark the job as accepted.
    #[serde(default = "default_accepted_patterns")]
    pub accepted_patterns: Vec<String>,

    /// Regexes that mark the job as accepted.
    #[serde(default)]
    pub accepted_regexes: Vec<String>,
}

fn default_poll_interval() -> String {
    format_duration(DEFAULT_POLL_INTERVAL)
}

fn default_accepted_patterns() -> Vec<String> {
    vec![DEFAULT_ACCEPTED_PATTERN.to_string()]
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            accepted_patterns: default_accepted_patterns(),
            accepted_regexes: Vec::new(),
        }
    }
}

/// Parsed `[supervisor]` settings.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub poll_interval: Duration,
    pub patterns: Vec<LinePattern>,
}

/// A job file whose durations and patterns have been parsed.
///
/// Field-level checks (script exists, jar set, ...) are not applied here;
/// see [`crate::config::validate`].
#[derive(Debug, Clone)]
pub struct JobFile {
    pub job: JobSection,
    pub supervisor: SupervisorSettings,
    pub variables: BTreeMap<String, String>,
    raw_supervisor: SupervisorSection,
}

impl JobFile {
    pub(crate) fn new_unchecked(
        job: JobSection,
        supervisor: SupervisorSettings,
        variables: BTreeMap<String, String>,
        raw_supervisor: SupervisorSection,
    ) -> Self {
        Self {
            job,
            supervisor,
            variables,
            raw_supervisor,
        }
    }

    /// Back to the serializable form, e.g. for saving.
    pub fn to_raw(&self) -> RawJobFile {
        RawJobFile {
            job: self.job.clone(),
            supervisor: self.raw_supervisor.clone(),
            variables: self.variables.clone(),
        }
    }
}

/// Parse a simple duration string like `"5s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SubmitError::ConfigError("empty duration string".to_string()));
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| SubmitError::ConfigError(format!("duration '{s}' is missing a unit suffix")))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part.parse().map_err(|e| {
        SubmitError::ConfigError(format!("invalid duration number '{num_part}': {e}"))
    })?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(SubmitError::ConfigError(format!(
                "unsupported duration unit '{unit}'; expected ms, s, m, or h"
            )));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| SubmitError::ConfigError(format!("duration '{s}' is too large")))
}

/// Inverse of [`parse_duration`] for whole seconds or milliseconds.
pub fn format_duration(d: Duration) -> String {
    if d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}
