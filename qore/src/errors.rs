//! Error types for the qore pipeline.
//!
//! Three domain errors cover the whole runtime surface:
//!
//! - [`ConfigLoadError`]: fatal, raised while building the registry at startup
//! - [`UnknownStageError`]: a caller asked for a stage that is not registered
//! - [`StageExecutionError`]: the external executor failed while running a stage
//!
//! Extraction has no error type; it is total.

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for qore operations.
#[derive(Debug, Error)]
pub enum QoreError {
    /// Configuration could not be loaded.
    #[error("{0}")]
    ConfigLoad(#[from] ConfigLoadError),

    /// A stage identifier did not resolve.
    #[error("{0}")]
    UnknownStage(#[from] UnknownStageError),

    /// A stage failed while executing.
    #[error("{0}")]
    StageExecution(#[from] StageExecutionError),
}

/// Error raised when required configuration is missing or malformed.
///
/// A process that hits this error at startup must not serve requests.
#[derive(Debug, Clone, Error)]
#[error("Failed to load configuration from {}: {message}", path.display())]
pub struct ConfigLoadError {
    /// The file or directory that could not be loaded.
    pub path: PathBuf,
    /// What went wrong.
    pub message: String,
}

impl ConfigLoadError {
    /// Creates a new config load error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an error for a file that does not exist.
    #[must_use]
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::new(path, "file not found")
    }

    /// Creates an error for an expected key absent from a config document.
    #[must_use]
    pub fn missing_key(path: impl Into<PathBuf>, key: &str) -> Self {
        Self::new(path, format!("missing required entry '{key}'"))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("ConfigLoad"));
        map.insert(
            "path".to_string(),
            serde_json::json!(self.path.display().to_string()),
        );
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a stage identifier is not in the registry.
#[derive(Debug, Clone, Error)]
#[error("Unknown stage '{stage_id}' (expected one of: {})", known.join(", "))]
pub struct UnknownStageError {
    /// The identifier that was requested.
    pub stage_id: String,
    /// The identifiers that would have resolved.
    pub known: Vec<String>,
}

impl UnknownStageError {
    /// Creates a new unknown stage error.
    #[must_use]
    pub fn new(stage_id: impl Into<String>, known: Vec<String>) -> Self {
        Self {
            stage_id: stage_id.into(),
            known,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("UnknownStage"));
        map.insert("stage_id".to_string(), serde_json::json!(self.stage_id));
        map.insert("known".to_string(), serde_json::json!(self.known));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when the external executor fails to run a stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("An error occurred while running stage '{stage}': {message}")]
pub struct StageExecutionError {
    /// The stage that was running.
    pub stage: String,
    /// The executor's diagnostic.
    pub message: String,
}

impl StageExecutionError {
    /// Creates a new stage execution error.
    #[must_use]
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("StageExecution"));
        map.insert("stage".to_string(), serde_json::json!(self.stage));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
