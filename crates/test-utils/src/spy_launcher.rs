use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use submitwatch::exec::{ProcessLauncher, SubmissionRequest, TokioLauncher};
use tokio::process::Child;

/// Launcher that counts launches and delegates to the real one.
#[derive(Debug, Clone, Default)]
pub struct SpyLauncher {
    launches: Arc<AtomicUsize>,
}

impl SpyLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for SpyLauncher {
    fn launch(&self, request: &SubmissionRequest) -> Result<Child> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        TokioLauncher.launch(request)
    }
}
