// tests/scanner.rs

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use submitwatch::exec::{DrainTask, LinePattern, LineScanner, MatchState, StreamKind};
use submitwatch_test_utils::{init_tracing, with_timeout};

fn patterns(list: &[&str]) -> Arc<[LinePattern]> {
    list.iter().map(|s| LinePattern::substring(*s)).collect::<Vec<_>>().into()
}

fn counting_scanner(
    kind: StreamKind,
    state: &Arc<MatchState>,
    hits: &Arc<AtomicUsize>,
) -> LineScanner {
    let mut scanner = LineScanner::new(kind, patterns(&["tracking URL:"]), Arc::clone(state));
    let hits = Arc::clone(hits);
    scanner.add_listener(Arc::new(move |_pattern: &str| {
        hits.fetch_add(1, Ordering::SeqCst);
    }));
    scanner
}

#[tokio::test]
async fn every_line_is_counted_including_matches() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let scanner = counting_scanner(StreamKind::Stdout, &state, &hits);

    let input: &[u8] = b"first\ntracking URL: http://x/\nlast line without newline";
    let lines = scanner.scan(input).await;

    assert_eq!(lines, 3);
    assert!(state.is_found());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn listeners_fire_once_across_both_streams() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let hits = Arc::new(AtomicUsize::new(0));

    let out = counting_scanner(StreamKind::Stdout, &state, &hits);
    let err = counting_scanner(StreamKind::Stderr, &state, &hits);

    let out_input: &[u8] = b"tracking URL: a\ntracking URL: b\n";
    let err_input: &[u8] = b"tracking URL: c\n";

    let mut out_drain = DrainTask::spawn(out, out_input);
    let mut err_drain = DrainTask::spawn(err, err_input);

    assert_eq!(with_timeout(out_drain.join()).await, 2);
    assert_eq!(with_timeout(err_drain.join()).await, 1);

    assert!(state.is_found());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn listener_receives_matched_pattern() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));

    let mut scanner = LineScanner::new(
        StreamKind::Stderr,
        patterns(&["never", "state: ACCEPTED"]),
        Arc::clone(&state),
    );
    {
        let seen = Arc::clone(&seen);
        scanner.add_listener(Arc::new(move |pattern: &str| {
            seen.lock().unwrap().push(pattern.to_string());
        }));
    }

    let input: &[u8] = b"Application report (state: ACCEPTED)\r\n";
    scanner.scan(input).await;

    assert_eq!(*seen.lock().unwrap(), vec!["state: ACCEPTED".to_string()]);
}

#[tokio::test]
async fn invalid_utf8_does_not_stop_the_scan() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let scanner = counting_scanner(StreamKind::Stdout, &state, &hits);

    let input: &[u8] = b"caf\xe9 latin-1 noise\ntracking URL: http://x/\n";
    let lines = scanner.scan(input).await;

    assert_eq!(lines, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn no_match_leaves_state_untouched() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let scanner = counting_scanner(StreamKind::Stdout, &state, &hits);

    let input: &[u8] = b"Submitting application\nUploading resource\n";
    scanner.scan(input).await;

    assert!(!state.is_found());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn joining_a_drain_twice_is_a_noop() {
    init_tracing();
    let state = Arc::new(MatchState::new());
    let scanner = LineScanner::new(StreamKind::Stdout, patterns(&[]), state);

    let input: &[u8] = b"one\ntwo\n";
    let mut drain = DrainTask::spawn(scanner, input);

    assert_eq!(with_timeout(drain.join()).await, 2);
    assert!(drain.is_joined());
    assert_eq!(with_timeout(drain.join()).await, 0);
}

#[test]
fn match_state_records_once() {
    let state = MatchState::new();
    assert!(!state.is_found());
    assert!(state.record());
    assert!(!state.record());
    assert!(state.is_found());
}

#[test]
fn regex_patterns_match_anywhere_in_line() {
    let re = LinePattern::regex(r"application_\d+_\d+").expect("valid regex");
    assert!(re.is_match("report for application_17_0042 (state: RUNNING)"));
    assert!(!re.is_match("report for app_17"));

    let sub = LinePattern::substring("tracking URL:");
    assert!(sub.is_match("INFO Client: tracking URL: http://x/"));
    assert!(!sub.is_match("tracking url:"));
}
