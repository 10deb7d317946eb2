//! Tests for the run result type.

use super::{RunResult, RunStatus};
use pretty_assertions::assert_eq;

#[test]
fn test_success_result() {
    let result = RunResult::success("- Save 20% of income");

    assert!(result.is_success());
    assert!(!result.is_error());
    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.answer(), Some("- Save 20% of income"));
    assert_eq!(result.error_message(), None);
}

#[test]
fn test_error_result() {
    let result = RunResult::error("Unknown stage 'taxes'");

    assert!(result.is_error());
    assert_eq!(result.answer(), None);
    assert_eq!(result.error_message(), Some("Unknown stage 'taxes'"));
}

#[test]
fn test_empty_answer_is_still_success() {
    let result = RunResult::success("");
    assert!(result.is_success());
    assert_eq!(result.answer(), Some(""));
}

#[test]
fn test_serialize_shape() {
    let result = RunResult::success("Net savings: $200");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "status": "success",
            "output": "Net savings: $200",
        })
    );
}

#[test]
fn test_deserialize_error() {
    let result: RunResult =
        serde_json::from_str(r#"{"status": "error", "output": "boom"}"#).unwrap();
    assert_eq!(result, RunResult::error("boom"));
}
