// src/exec/termination.rs

//! Termination requests and the caller-facing cancel hook.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::process::Child;
use tokio::sync::watch;
use tracing::debug;

/// Latching "terminate the submitter" request.
///
/// Any number of clones may call [`trigger`](Self::trigger); the supervisor
/// awaits [`triggered`](Self::triggered) next to the process wait. A request
/// made before the supervisor starts waiting is not lost.
#[derive(Debug, Clone)]
pub struct KillSwitch {
    tx: Arc<watch::Sender<bool>>,
}

impl KillSwitch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request termination. Returns `true` for the first request only.
    pub fn trigger(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once termination has been requested.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|requested| *requested).await;
    }
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation hook handed out by [`crate::exec::Supervisor::cancel_handle`].
///
/// Covers forced cleanup on abnormal workflow teardown, independently of the
/// stop predicate.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    kill: KillSwitch,
    finished: Arc<AtomicBool>,
}

impl CancelHandle {
    pub(crate) fn new(kill: KillSwitch, finished: Arc<AtomicBool>) -> Self {
        Self { kill, finished }
    }

    /// Destroy the submitter if it is still running.
    ///
    /// Returns `true` if this call issued the termination request. Calling it
    /// after the process exited, or twice, does nothing.
    pub fn destroy(&self) -> bool {
        if self.finished.load(Ordering::Acquire) {
            debug!("destroy requested but submitter already finished");
            return false;
        }
        self.kill.trigger()
    }
}

/// Kill the child without a shutdown handshake.
///
/// On Unix the whole process group goes down, so helpers forked by the
/// submitter script cannot keep the output pipes open.
pub(crate) fn terminate(child: &mut Child) {
    if kill_process_group(child) {
        return;
    }

    if let Err(e) = child.start_kill() {
        debug!(error = %e, "kill on submitter process failed (already exited?)");
    }
}

/// Kill whatever is left of the submitter's process group once the leader
/// has been reaped. Helpers that inherited the output pipes would otherwise
/// keep the drains open. An already empty group is fine.
#[cfg(unix)]
pub(crate) fn reap_process_group(pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };

    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) => debug!(pid, "killed processes left behind by the submitter"),
        Err(Errno::ESRCH) => {}
        Err(e) => debug!(pid, error = %e, "could not clean up submitter process group"),
    }
}

#[cfg(not(unix))]
pub(crate) fn reap_process_group(_pid: Option<u32>) {}

#[cfg(unix)]
fn kill_process_group(child: &Child) -> bool {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return false;
    };

    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) => true,
        Err(e) => {
            debug!(pid, error = %e, "killing process group failed; killing child only");
            false
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) -> bool {
    false
}
