//! Shared fixtures for the `submitwatch` integration tests: request and job
//! builders, throwaway submitter scripts, and a counting launcher.

pub mod builders;
pub mod scripts;
pub mod spy_launcher;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single supervised run in the tests. Generous enough
/// for a loaded CI box, far below the `sleep 30` used by the long scripts.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Route `tracing` output (including forwarded submitter lines) into the
/// test harness capture. `RUST_LOG` overrides the default `debug` filter.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("submitwatch=debug,info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, panicking after [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(v) => v,
        Err(_) => panic!("test timed out after {TEST_TIMEOUT:?}"),
    }
}
