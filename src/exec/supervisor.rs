// src/exec/supervisor.rs

//! The process supervisor: launch, drain, race, finalize.

use std::io;
use std::process::ExitStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::process::Child;
use tracing::{debug, error, info, warn};

use crate::config::validate::validate_request;
use crate::exec::drain::DrainTask;
use crate::exec::launcher::{ProcessLauncher, TokioLauncher};
use crate::exec::match_state::MatchState;
use crate::exec::outcome::{exit_code_of, RunOutcome};
use crate::exec::request::{LinePattern, SubmissionRequest};
use crate::exec::scanner::{LineScanner, MatchListener, StreamKind};
use crate::exec::termination::{reap_process_group, terminate, CancelHandle, KillSwitch};
use crate::exec::watcher::{spawn_watcher, StopPredicate};
use crate::fs::{FileSystem, RealFileSystem};

/// Lifecycle of a [`Supervisor`]. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NotStarted,
    Running,
    Exited,
    Finalized,
}

/// Supervises exactly one submitter process.
///
/// - Both output streams are drained on their own tasks and scanned for
///   accepted patterns.
/// - In non-blocking mode the first accepted line records the match and
///   kills the submitter.
/// - A cancellation watcher kills the submitter when the stop predicate
///   fires.
///
/// Whatever happens, [`run`](Self::run) returns a [`RunOutcome`].
pub struct Supervisor {
    launcher: Arc<dyn ProcessLauncher>,
    stop: Arc<dyn StopPredicate>,
    fs: Arc<dyn FileSystem>,
    kill: KillSwitch,
    finished: Arc<AtomicBool>,
    state: SupervisorState,
}

impl Supervisor {
    pub fn new(stop: Arc<dyn StopPredicate>) -> Self {
        Self {
            launcher: Arc::new(TokioLauncher),
            stop,
            fs: Arc::new(RealFileSystem),
            kill: KillSwitch::new(),
            finished: Arc::new(AtomicBool::new(false)),
            state: SupervisorState::NotStarted,
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Filesystem used for the pre-launch executable check.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(self.kill.clone(), Arc::clone(&self.finished))
    }

    /// Run the submission to completion.
    pub async fn run(&mut self, request: &SubmissionRequest) -> RunOutcome {
        if self.state != SupervisorState::NotStarted {
            warn!(state = ?self.state, "supervisor already used; refusing to launch a second process");
            return RunOutcome::launch_failed();
        }

        let violations = validate_request(request, self.fs.as_ref());
        if !violations.is_empty() {
            for violation in &violations {
                error!(%violation, "submission rejected before launch");
            }
            self.finish(SupervisorState::Finalized);
            return RunOutcome::validation_failed();
        }

        info!(
            program = %request.program.display(),
            blocking = request.blocking,
            "submitting job"
        );
        debug!(command = ?request.command_line(), "resolved submit command");

        match self.supervise(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("error submitting job: {:#}", err);
                self.finish(SupervisorState::Finalized);
                RunOutcome::launch_failed()
            }
        }
    }

    async fn supervise(&mut self, request: &SubmissionRequest) -> Result<RunOutcome> {
        let mut child = self.launcher.launch(request)?;
        self.state = SupervisorState::Running;
        let pid = child.id();
        debug!(?pid, "submitter process started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdout), Some(stderr)) = (stdout, stderr) else {
            terminate(&mut child);
            let _ = child.wait().await;
            anyhow::bail!("submitter process was started without piped stdout/stderr");
        };

        let match_state = Arc::new(MatchState::new());
        let patterns: Arc<[LinePattern]> = request.patterns.clone().into();
        let mut out_scanner =
            LineScanner::new(StreamKind::Stdout, Arc::clone(&patterns), Arc::clone(&match_state));
        let mut err_scanner =
            LineScanner::new(StreamKind::Stderr, patterns, Arc::clone(&match_state));

        if !request.blocking {
            let listener = accepted_listener(self.kill.clone());
            out_scanner.add_listener(Arc::clone(&listener));
            err_scanner.add_listener(listener);
        }

        let mut out_drain = DrainTask::spawn(out_scanner, stdout);
        let mut err_drain = DrainTask::spawn(err_scanner, stderr);

        let watcher = spawn_watcher(
            Arc::clone(&self.stop),
            Arc::clone(&self.finished),
            self.kill.clone(),
            request.poll_interval,
        );

        let waited = wait_for_exit(&mut child, &self.kill).await;
        self.finished.store(true, Ordering::Release);
        watcher.abort();
        if waited.is_err() {
            terminate(&mut child);
        }
        reap_process_group(pid);
        self.state = SupervisorState::Exited;
        debug!(?pid, "submitter finished");

        // Output is only fully accounted for once both streams hit EOF.
        let out_lines = out_drain.join().await;
        let err_lines = err_drain.join().await;
        drop(child);
        debug!(stdout_lines = out_lines, stderr_lines = err_lines, "output drained");

        let status = waited.context("waiting for submitter process")?;
        let process_code = exit_code_of(status);
        let outcome = RunOutcome::from_exit(request.blocking, match_state.is_found(), process_code);
        self.state = SupervisorState::Finalized;

        if outcome.succeeded {
            info!(exit_code = outcome.exit_code, "job submitted");
        } else {
            info!(
                exit_code = outcome.exit_code,
                matched = match_state.is_found(),
                "job submission failed"
            );
        }

        Ok(outcome)
    }

    fn finish(&mut self, state: SupervisorState) {
        self.finished.store(true, Ordering::Release);
        self.state = state;
    }
}

/// Listener used in non-blocking mode: the match is already recorded by the
/// scanner, so all that is left is stopping the submitter.
fn accepted_listener(kill: KillSwitch) -> MatchListener {
    Arc::new(move |pattern: &str| {
        debug!(pattern, "found match in output, considering job submitted; stopping submitter");
        kill.trigger();
    })
}

async fn wait_for_exit(child: &mut Child, kill: &KillSwitch) -> io::Result<ExitStatus> {
    tokio::select! {
        status = child.wait() => status,
        () = kill.triggered() => {
            debug!(pid = ?child.id(), "termination requested");
            terminate(child);
            child.wait().await
        }
    }
}

/// Run one submission with a fresh [`Supervisor`].
pub async fn run(request: &SubmissionRequest, stop: Arc<dyn StopPredicate>) -> RunOutcome {
    Supervisor::new(stop).run(request).await
}
