// tests/supervisor_blocking.rs

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use submitwatch::exec::{FailureKind, NeverStop, Supervisor, SupervisorState};
use submitwatch_test_utils::builders::RequestBuilder;
use submitwatch_test_utils::scripts::ScriptDir;
use submitwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn blocking_exit_zero_succeeds() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("ok.sh", "echo submitting\necho 'some warning' >&2\nexit 0");

    let request = RequestBuilder::shell_script(&script).blocking(true).build();
    let mut supervisor = Supervisor::new(Arc::new(NeverStop));
    let outcome = with_timeout(supervisor.run(&request)).await;

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.succeeded);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.failure, None);
    assert_eq!(supervisor.state(), SupervisorState::Finalized);
    Ok(())
}

#[tokio::test]
async fn blocking_exit_code_two_is_reported() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("fail.sh", "exit 2");

    let request = RequestBuilder::shell_script(&script).blocking(true).build();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(NeverStop))).await;

    assert_eq!(outcome.exit_code, 2);
    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.failure, Some(FailureKind::AbnormalExit));
    Ok(())
}

#[tokio::test]
async fn blocking_mode_ignores_accepted_line() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script(
        "accepted_then_fail.sh",
        "echo 'tracking URL: http://rm:8088/proxy/application_1_0001/'\nexit 3",
    );

    let request = RequestBuilder::shell_script(&script)
        .blocking(true)
        .pattern("tracking URL:")
        .build();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(NeverStop))).await;

    assert_eq!(outcome.exit_code, 3);
    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_count, 1);
    Ok(())
}

#[tokio::test]
async fn environment_overrides_reach_the_child() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script(
        "env.sh",
        "[ \"$SUBMITWATCH_TEST_QUEUE\" = \"etl\" ] || exit 7\nexit 0",
    );

    let request = RequestBuilder::shell_script(&script)
        .env("SUBMITWATCH_TEST_QUEUE", "etl")
        .build();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(NeverStop))).await;

    assert_eq!(outcome.exit_code, 0, "child did not see the exported variable");
    Ok(())
}

/// Both pipes carry far more than an OS pipe buffer; the run only finishes
/// if they are drained concurrently.
#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script(
        "chatty.sh",
        "yes 'stderr filler line for pipe pressure' | head -n 20000 >&2\n\
         yes 'stdout filler line for pipe pressure' | head -n 20000\n\
         exit 0",
    );

    let request = RequestBuilder::shell_script(&script).build();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(NeverStop))).await;

    assert!(outcome.succeeded);
    Ok(())
}

#[tokio::test]
async fn supervisor_refuses_a_second_run() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("once.sh", "exit 0");

    let request = RequestBuilder::shell_script(&script).build();
    let mut supervisor = Supervisor::new(Arc::new(NeverStop));

    let first = with_timeout(supervisor.run(&request)).await;
    assert!(first.succeeded);

    let second = with_timeout(supervisor.run(&request)).await;
    assert!(!second.succeeded);
    assert_eq!(second.failure, Some(FailureKind::Launch));
    Ok(())
}

/// A helper left running in the background after the submitter exits holds
/// the output pipes open; it is cleaned up instead of stretching the run.
#[tokio::test]
async fn leftover_background_helper_does_not_outlive_blocking_run() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("detach.sh", "sleep 30 &\necho 'submitted'\nexit 0");

    let request = RequestBuilder::shell_script(&script).blocking(true).build();

    let started = Instant::now();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(NeverStop))).await;

    assert!(started.elapsed() < Duration::from_secs(5), "run waited for the helper");
    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.succeeded);
    Ok(())
}
