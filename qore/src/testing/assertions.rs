//! Test assertions for run results.

use crate::core::RunResult;

/// Asserts that the run succeeded.
pub fn assert_run_succeeded(result: &RunResult) {
    assert!(
        result.is_success(),
        "Expected success, got error: {}",
        result.output
    );
}

/// Asserts that the run failed.
pub fn assert_run_failed(result: &RunResult) {
    assert!(
        result.is_error(),
        "Expected error, got success with output: {:?}",
        result.output
    );
}

/// Asserts that the run succeeded with exactly `expected` as its answer.
pub fn assert_answer(result: &RunResult, expected: &str) {
    assert_run_succeeded(result);
    assert_eq!(result.output, expected, "Unexpected answer");
}

/// Asserts that the run failed with a message containing `needle`.
pub fn assert_error_contains(result: &RunResult, needle: &str) {
    assert_run_failed(result);
    assert!(
        result.output.contains(needle),
        "Expected error containing '{}', got: {}",
        needle,
        result.output
    );
}
