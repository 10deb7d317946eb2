//! Mock executors for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::capture::CaptureSink;
use crate::context::InputContext;
use crate::core::StageKind;
use crate::errors::StageExecutionError;
use crate::executor::{StageExecutor, StageResult};
use crate::registry::StageDescriptor;

#[derive(Debug, Clone)]
struct Script {
    log_lines: Vec<String>,
    outcome: Result<StageResult, String>,
}

/// An executor that replays scripted results and records every call.
///
/// Stages without a script succeed with empty text. Log lines are written
/// to the run's sink one at a time, yielding to the runtime in between, so
/// concurrent runs get a chance to interleave.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    scripts: HashMap<StageKind, Script>,
    calls: Mutex<Vec<StageKind>>,
    inputs: Mutex<Vec<InputContext>>,
}

impl ScriptedExecutor {
    /// Creates an executor with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful result for `kind`.
    #[must_use]
    pub fn with_result(mut self, kind: StageKind, result: impl Into<StageResult>) -> Self {
        self.script(kind).outcome = Ok(result.into());
        self
    }

    /// Scripts a failure for `kind`.
    #[must_use]
    pub fn with_failure(mut self, kind: StageKind, message: impl Into<String>) -> Self {
        self.script(kind).outcome = Err(message.into());
        self
    }

    /// Scripts log lines written before `kind` returns.
    #[must_use]
    pub fn with_log(mut self, kind: StageKind, lines: &[&str]) -> Self {
        self.script(kind)
            .log_lines
            .extend(lines.iter().map(|l| (*l).to_string()));
        self
    }

    fn script(&mut self, kind: StageKind) -> &mut Script {
        self.scripts.entry(kind).or_insert_with(|| Script {
            log_lines: Vec::new(),
            outcome: Ok(StageResult::Text(String::new())),
        })
    }

    /// Returns the stages executed, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<StageKind> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the inputs seen by each call.
    #[must_use]
    pub fn recorded_inputs(&self) -> Vec<InputContext> {
        self.inputs.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
        self.inputs.lock().clear();
    }
}

#[async_trait]
impl StageExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        stage: &StageDescriptor,
        inputs: &InputContext,
        log: &CaptureSink,
    ) -> Result<StageResult, StageExecutionError> {
        self.calls.lock().push(stage.kind);
        self.inputs.lock().push(inputs.clone());

        let Some(script) = self.scripts.get(&stage.kind) else {
            return Ok(StageResult::Text(String::new()));
        };

        for line in &script.log_lines {
            log.write_line(line);
            tokio::task::yield_now().await;
        }

        script
            .outcome
            .clone()
            .map_err(|message| StageExecutionError::new(stage.id(), message))
    }
}

/// An executor that always fails.
#[derive(Debug)]
pub struct FailingExecutor {
    message: String,
}

impl FailingExecutor {
    /// Creates a failing executor with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl StageExecutor for FailingExecutor {
    async fn execute(
        &self,
        stage: &StageDescriptor,
        _inputs: &InputContext,
        _log: &CaptureSink,
    ) -> Result<StageResult, StageExecutionError> {
        Err(StageExecutionError::new(stage.id(), self.message.clone()))
    }
}
