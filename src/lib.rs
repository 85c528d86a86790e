// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::{build_request, check, load_and_validate, Remark, VariableSpace};
use crate::exec::{RunOutcome, StopFlag, SubmissionRequest, Supervisor};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading and variable resolution
/// - `--check` / `--dry-run` reports
/// - the supervisor
/// - Ctrl-C handling
///
/// Returns the exit code the binary should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let mut file = load_and_validate(&args.config)
        .with_context(|| format!("loading job file {}", args.config.display()))?;

    if args.no_block {
        file.job.block_execution = false;
    }

    let vars = VariableSpace::from_env()
        .with_variables(file.variables.clone())
        .with_variables(args.vars.iter().cloned());

    if args.check {
        let remarks = check(&file.job, &vars, &RealFileSystem);
        print_remarks(&remarks);
        return Ok(if remarks.is_empty() { 0 } else { 1 });
    }

    let request = build_request(&file, &vars);

    if args.dry_run {
        print_dry_run(&request);
        return Ok(0);
    }

    let stop = StopFlag::new();
    let mut supervisor = Supervisor::new(Arc::new(stop.clone()));

    // Ctrl-C → stop the submitter right away.
    {
        let cancel = supervisor.cancel_handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl-C");
                return;
            }
            warn!("Ctrl-C received; stopping submission");
            stop.request_stop();
            cancel.destroy();
        });
    }

    let outcome = supervisor.run(&request).await;
    info!(
        exit_code = outcome.exit_code,
        succeeded = outcome.succeeded,
        errors = outcome.error_count,
        "submission finished"
    );

    Ok(process_exit_code(&outcome))
}

/// Map a run outcome to the binary's exit code.
///
/// Failures without a usable positive code exit with 1.
pub fn process_exit_code(outcome: &RunOutcome) -> i32 {
    if outcome.succeeded {
        0
    } else if outcome.exit_code > 0 {
        outcome.exit_code
    } else {
        1
    }
}

fn print_remarks(remarks: &[Remark]) {
    if remarks.is_empty() {
        println!("job file OK");
        return;
    }

    println!("remarks ({}):", remarks.len());
    for remark in remarks {
        println!("  - {remark}");
    }
}

/// Simple dry-run output: print the resolved command and supervision mode.
fn print_dry_run(request: &SubmissionRequest) {
    println!("submitwatch dry-run");
    println!("  command: {}", request.command_line().join(" "));
    println!("  blocking: {}", request.blocking);
    println!("  poll_interval: {:?}", request.poll_interval);

    let patterns: Vec<&str> = request.patterns.iter().map(|p| p.as_str()).collect();
    println!("  accepted_patterns: {:?}", patterns);

    if !request.env.is_empty() {
        println!("  exported variables:");
        for name in request.env.keys() {
            println!("    - {name}");
        }
    }

    debug!("dry-run complete (no execution)");
}
