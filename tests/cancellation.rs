// tests/cancellation.rs

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use submitwatch::exec::{
    spawn_watcher, FailureKind, KillSwitch, NeverStop, StopFlag, Supervisor, WatcherExit,
};
use submitwatch_test_utils::builders::RequestBuilder;
use submitwatch_test_utils::scripts::ScriptDir;
use submitwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const KILLED_PROMPTLY: Duration = Duration::from_secs(5);

#[tokio::test]
async fn stop_predicate_terminates_running_submitter() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("long.sh", "echo 'waiting for application'\nsleep 30");

    let request = RequestBuilder::shell_script(&script)
        .blocking(true)
        .poll_interval(Duration::from_millis(50))
        .build();

    let stop = StopFlag::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            stop.request_stop();
        });
    }

    let started = Instant::now();
    let mut supervisor = Supervisor::new(Arc::new(stop));
    let outcome = with_timeout(supervisor.run(&request)).await;

    assert!(started.elapsed() < KILLED_PROMPTLY, "stop request was not honoured");
    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.failure, Some(FailureKind::AbnormalExit));
    // SIGKILL
    assert_eq!(outcome.exit_code, 128 + 9);
    Ok(())
}

#[tokio::test]
async fn closure_predicate_already_true_stops_immediately() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("long.sh", "sleep 30");

    let request = RequestBuilder::shell_script(&script).build();

    let started = Instant::now();
    let outcome = with_timeout(submitwatch::exec::run(&request, Arc::new(|| true))).await;

    assert!(started.elapsed() < KILLED_PROMPTLY);
    assert!(!outcome.succeeded);
    Ok(())
}

#[tokio::test]
async fn cancel_handle_destroys_running_submitter() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("long.sh", "sleep 30");

    let request = RequestBuilder::shell_script(&script).build();
    let mut supervisor = Supervisor::new(Arc::new(NeverStop));
    let cancel = supervisor.cancel_handle();

    let destroyer = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            cancel.destroy()
        })
    };

    let started = Instant::now();
    let outcome = with_timeout(supervisor.run(&request)).await;

    assert!(started.elapsed() < KILLED_PROMPTLY);
    assert!(destroyer.await?, "first destroy should issue the termination");
    assert!(!outcome.succeeded);

    // Process is gone: further calls are no-ops.
    assert!(!cancel.destroy());
    assert!(!cancel.destroy());
    Ok(())
}

#[tokio::test]
async fn cancel_handle_after_natural_exit_is_noop() -> TestResult {
    init_tracing();
    let scripts = ScriptDir::new();
    let script = scripts.script("ok.sh", "exit 0");

    let request = RequestBuilder::shell_script(&script).build();
    let mut supervisor = Supervisor::new(Arc::new(NeverStop));
    let cancel = supervisor.cancel_handle();

    let outcome = with_timeout(supervisor.run(&request)).await;
    assert!(outcome.succeeded);
    assert!(!cancel.destroy());
    Ok(())
}

#[tokio::test]
async fn watcher_does_not_kill_finished_process() -> TestResult {
    init_tracing();
    let kill = KillSwitch::new();
    let finished = Arc::new(AtomicBool::new(true));

    let exit = with_timeout(spawn_watcher(
        Arc::new(|| true),
        finished,
        kill.clone(),
        Duration::from_millis(10),
    ))
    .await?;

    assert_eq!(exit, WatcherExit::ProcessFinished);
    assert!(!kill.is_triggered());
    Ok(())
}

#[tokio::test]
async fn watcher_requests_termination_within_one_interval() -> TestResult {
    init_tracing();
    let kill = KillSwitch::new();
    let finished = Arc::new(AtomicBool::new(false));
    let stop = StopFlag::new();

    let handle = spawn_watcher(
        Arc::new(stop.clone()),
        finished,
        kill.clone(),
        Duration::from_millis(50),
    );

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(!kill.is_triggered(), "nothing asked to stop yet");

    stop.request_stop();
    with_timeout(kill.triggered()).await;

    assert_eq!(handle.await?, WatcherExit::StopRequested);
    Ok(())
}

#[tokio::test]
async fn kill_switch_request_before_waiting_is_not_lost() -> TestResult {
    let kill = KillSwitch::new();
    assert!(kill.trigger());
    assert!(!kill.trigger(), "second trigger is not the first request");

    with_timeout(kill.triggered()).await;
    assert!(kill.is_triggered());
    Ok(())
}

#[tokio::test]
async fn zero_poll_interval_does_not_spin() -> TestResult {
    init_tracing();
    let kill = KillSwitch::new();
    let finished = Arc::new(AtomicBool::new(false));
    let polls = Arc::new(AtomicUsize::new(0));

    let predicate = {
        let polls = Arc::clone(&polls);
        move || {
            polls.fetch_add(1, Ordering::SeqCst);
            false
        }
    };
    let handle = spawn_watcher(Arc::new(predicate), Arc::clone(&finished), kill.clone(), Duration::ZERO);

    tokio::time::sleep(Duration::from_millis(100)).await;
    finished.store(true, Ordering::Release);
    assert_eq!(with_timeout(handle).await?, WatcherExit::ProcessFinished);

    // 100ms at the 10ms floor is about ten polls; a spinning watcher does thousands.
    let count = polls.load(Ordering::SeqCst);
    assert!(count <= 30, "watcher polled {count} times in 100ms");
    assert!(!kill.is_triggered());
    Ok(())
}
