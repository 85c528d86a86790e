// src/exec/scanner.rs

//! Line-by-line scanning of one submitter output stream.

use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info};

use crate::exec::match_state::MatchState;
use crate::exec::request::LinePattern;

/// Which pipe of the child a scanner is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Callback fired when an accepted pattern is first seen. Receives the
/// pattern that matched.
///
/// Runs inline on the drain task, so keep it short: flip a flag, request
/// termination.
pub type MatchListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Forwards every line of a stream to the log and watches for accepted
/// patterns.
///
/// The [`MatchState`] is shared with the scanner of the other stream, so
/// listeners fire once per run no matter how often, or on which stream, a
/// pattern shows up.
pub struct LineScanner {
    kind: StreamKind,
    patterns: Arc<[LinePattern]>,
    state: Arc<MatchState>,
    listeners: Vec<MatchListener>,
}

impl LineScanner {
    pub fn new(kind: StreamKind, patterns: Arc<[LinePattern]>, state: Arc<MatchState>) -> Self {
        Self {
            kind,
            patterns,
            state,
            listeners: Vec::new(),
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Register a listener. Only listeners added before [`scan`](Self::scan)
    /// starts are observed.
    pub fn add_listener(&mut self, listener: MatchListener) {
        self.listeners.push(listener);
    }

    /// Consume `stream` until end-of-stream and return the number of lines
    /// seen.
    ///
    /// Read errors (typically the pipe being torn down while the process is
    /// killed) end the scan quietly.
    pub async fn scan<R>(&self, stream: R) -> usize
    where
        R: AsyncRead + Unpin,
    {
        let mut segments = BufReader::new(stream).split(b'\n');
        let mut count = 0usize;

        loop {
            match segments.next_segment().await {
                Ok(Some(raw)) => {
                    let line = decode_line(&raw);
                    count += 1;
                    self.forward(&line);
                    self.check(&line);
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(stream = %self.kind, error = %e, "stream read ended with error");
                    break;
                }
            }
        }

        debug!(stream = %self.kind, lines = count, "stream scan finished");
        count
    }

    fn forward(&self, line: &str) {
        match self.kind {
            StreamKind::Stdout => info!(stream = %self.kind, "{}", line),
            StreamKind::Stderr => error!(stream = %self.kind, "{}", line),
        }
    }

    fn check(&self, line: &str) {
        if self.state.is_found() {
            return;
        }

        let Some(pattern) = self.patterns.iter().find(|p| p.is_match(line)) else {
            return;
        };

        // Only the scanner that flips the shared state notifies.
        if self.state.record() {
            debug!(stream = %self.kind, pattern = %pattern, "accepted pattern found in output");
            for listener in &self.listeners {
                listener(pattern.as_str());
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
