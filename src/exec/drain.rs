// src/exec/drain.rs

//! One background task per output stream.

use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::exec::scanner::{LineScanner, StreamKind};

/// A [`LineScanner`] running to completion on its own Tokio task.
///
/// stdout and stderr each get one, so a full pipe on one side never stalls
/// the other. The stream is owned by the task and closed when it ends.
pub struct DrainTask {
    kind: StreamKind,
    handle: Option<JoinHandle<usize>>,
}

impl DrainTask {
    /// Start draining `stream` immediately.
    pub fn spawn<R>(scanner: LineScanner, stream: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let kind = scanner.kind();
        let handle = tokio::spawn(async move { scanner.scan(stream).await });
        Self {
            kind,
            handle: Some(handle),
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn is_joined(&self) -> bool {
        self.handle.is_none()
    }

    /// Wait for the stream to reach end-of-stream and return how many lines
    /// were drained.
    ///
    /// Joining twice is a no-op that returns 0.
    pub async fn join(&mut self) -> usize {
        let Some(handle) = self.handle.take() else {
            return 0;
        };

        match handle.await {
            Ok(lines) => lines,
            Err(e) => {
                debug!(stream = %self.kind, error = %e, "drain task did not complete normally");
                0
            }
        }
    }
}
