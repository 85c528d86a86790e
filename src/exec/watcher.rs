// src/exec/watcher.rs

//! Polls the enclosing workflow's "stop requested" state while the
//! submitter runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::exec::request::MIN_POLL_INTERVAL;
use crate::exec::termination::KillSwitch;

/// "Has the enclosing unit of work been asked to stop?"
pub trait StopPredicate: Send + Sync {
    fn should_stop(&self) -> bool;
}

impl<F> StopPredicate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_stop(&self) -> bool {
        self()
    }
}

/// Predicate for callers that never cancel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl StopPredicate for NeverStop {
    fn should_stop(&self) -> bool {
        false
    }
}

/// Shared boolean stop flag, e.g. flipped by a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl StopPredicate for StopFlag {
    fn should_stop(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why the watcher stopped polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherExit {
    /// The process finished first; nothing was terminated.
    ProcessFinished,
    /// The stop predicate fired and termination was requested.
    StopRequested,
}

/// Spawn the cancellation watcher.
///
/// Checks `finished` and `stop` right away and then once per `interval`
/// (never more often than [`MIN_POLL_INTERVAL`]). A process already marked
/// finished is never terminated.
pub fn spawn_watcher(
    stop: Arc<dyn StopPredicate>,
    finished: Arc<AtomicBool>,
    kill: KillSwitch,
    interval: Duration,
) -> JoinHandle<WatcherExit> {
    let interval = interval.max(MIN_POLL_INTERVAL);

    tokio::spawn(async move {
        loop {
            if finished.load(Ordering::Acquire) {
                debug!("submitter finished; cancellation watcher exiting");
                return WatcherExit::ProcessFinished;
            }

            if stop.should_stop() {
                if finished.load(Ordering::Acquire) {
                    return WatcherExit::ProcessFinished;
                }
                info!("stop requested; terminating submitter process");
                kill.trigger();
                return WatcherExit::StopRequested;
            }

            sleep(interval).await;
        }
    })
}
