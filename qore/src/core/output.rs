//! Run result type returned to callers.

use super::RunStatus;
use serde::{Deserialize, Serialize};

/// The result of a pipeline run.
///
/// `output` holds the extracted answer on success and the diagnostic
/// message on error. Callers always receive one of these; failures are
/// reported through `status`, never by propagating an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Whether the run succeeded.
    pub status: RunStatus,
    /// The answer or the error message.
    pub output: String,
}

impl RunResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Success,
            output: output.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            output: message.into(),
        }
    }

    /// Returns true if the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the run failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns the answer if the run succeeded.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.is_success().then_some(self.output.as_str())
    }

    /// Returns the error message if the run failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.is_error().then_some(self.output.as_str())
    }
}
