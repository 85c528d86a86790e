// tests/outcome_properties.rs

use proptest::prelude::*;
use submitwatch::exec::{FailureKind, RunOutcome};
use submitwatch::process_exit_code;

proptest! {
    #[test]
    fn blocking_mode_always_reports_process_code(matched in any::<bool>(), code in -1i32..256) {
        let outcome = RunOutcome::from_exit(true, matched, code);
        prop_assert_eq!(outcome.exit_code, code);
        prop_assert_eq!(outcome.succeeded, code == 0);
    }

    #[test]
    fn non_blocking_match_always_succeeds(code in -1i32..256) {
        let outcome = RunOutcome::from_exit(false, true, code);
        prop_assert_eq!(outcome.exit_code, 0);
        prop_assert!(outcome.succeeded);
        prop_assert_eq!(outcome.error_count, 0);
        prop_assert_eq!(outcome.failure, None);
    }

    #[test]
    fn non_blocking_without_match_keeps_natural_code(code in -1i32..256) {
        let outcome = RunOutcome::from_exit(false, false, code);
        prop_assert_eq!(outcome.exit_code, code);
    }

    #[test]
    fn error_count_mirrors_success(blocking in any::<bool>(), matched in any::<bool>(), code in -1i32..256) {
        let outcome = RunOutcome::from_exit(blocking, matched, code);
        prop_assert_eq!(outcome.error_count, if outcome.succeeded { 0 } else { 1 });
        prop_assert_eq!(
            outcome.failure,
            (!outcome.succeeded).then_some(FailureKind::AbnormalExit)
        );
    }

    #[test]
    fn binary_exit_code_is_zero_only_on_success(blocking in any::<bool>(), matched in any::<bool>(), code in -1i32..256) {
        let outcome = RunOutcome::from_exit(blocking, matched, code);
        prop_assert_eq!(process_exit_code(&outcome) == 0, outcome.succeeded);
    }
}

#[test]
fn launch_failure_counts_one_error() {
    let outcome = RunOutcome::launch_failed();
    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.failure, Some(FailureKind::Launch));
    assert_eq!(process_exit_code(&outcome), 1);
}

#[test]
fn validation_failure_fails_without_counting_an_error() {
    let outcome = RunOutcome::validation_failed();
    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.failure, Some(FailureKind::Validation));
    assert_eq!(process_exit_code(&outcome), 1);
}
