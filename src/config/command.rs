// src/config/command.rs

//! Turn a job file into the `spark-submit` command line and a
//! [`SubmissionRequest`].

use std::path::PathBuf;

use crate::config::model::{JobFile, JobSection};
use crate::config::validate::is_blank;
use crate::config::variables::VariableSpace;
use crate::exec::request::SubmissionRequest;

/// Build the submit command as a list of strings, executable first:
///
/// ```text
/// <spark-submit> --master <master> [--class <main-class>] [--conf <k>=<v>]...
///     [--driver-memory <m>] [--executor-memory <m>] <application-jar> [app args...]
/// ```
///
/// Every field except the jar goes through variable substitution. App args
/// are split on single spaces and empty pieces are dropped.
pub fn build_command(job: &JobSection, vars: &VariableSpace) -> Vec<String> {
    let mut cmds = vec![
        vars.substitute(&job.script_path),
        "--master".to_string(),
        vars.substitute(&job.master),
    ];

    if let Some(class_name) = non_blank(&job.class_name) {
        cmds.push("--class".to_string());
        cmds.push(vars.substitute(class_name));
    }

    for param in &job.conf {
        cmds.push("--conf".to_string());
        cmds.push(vars.substitute(param));
    }

    if let Some(mem) = non_blank(&job.driver_memory) {
        cmds.push("--driver-memory".to_string());
        cmds.push(vars.substitute(mem));
    }

    if let Some(mem) = non_blank(&job.executor_memory) {
        cmds.push("--executor-memory".to_string());
        cmds.push(vars.substitute(mem));
    }

    cmds.push(job.jar.clone());

    if let Some(args) = non_blank(&job.args) {
        cmds.extend(
            vars.substitute(args)
                .split(' ')
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        );
    }

    cmds
}

/// Resolve a job file into the request the supervisor runs.
pub fn build_request(file: &JobFile, vars: &VariableSpace) -> SubmissionRequest {
    let mut cmds = build_command(&file.job, vars).into_iter();
    let program = PathBuf::from(cmds.next().unwrap_or_default());

    SubmissionRequest {
        program,
        args: cmds.collect(),
        env: vars.exported().clone(),
        blocking: file.job.block_execution,
        patterns: file.supervisor.patterns.clone(),
        master: vars.substitute(&file.job.master),
        application: file.job.jar.clone(),
        poll_interval: file.supervisor.poll_interval,
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !is_blank(s))
}
