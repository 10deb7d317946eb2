//! Stage executors.
//!
//! A [`StageExecutor`] is the boundary to whatever actually runs an agent
//! on its task (a model call, a subprocess). The pipeline only requires
//! that it can be called once per stage and that it eventually returns a
//! [`StageResult`] or fails.

mod command;
mod result;

pub use command::CommandExecutor;
pub use result::{StageResult, TaskOutput, OUTPUT_KEYS};

use crate::capture::CaptureSink;
use crate::context::InputContext;
use crate::errors::StageExecutionError;
use crate::registry::StageDescriptor;
use async_trait::async_trait;

/// Runs one stage against the run's inputs.
///
/// Implementations return their answer as a value. Verbose progress or
/// log text belongs in `log`, which is scoped to the current run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// Executes `stage` against `inputs`.
    ///
    /// # Errors
    ///
    /// Returns `StageExecutionError` if the stage could not produce a result.
    async fn execute(
        &self,
        stage: &StageDescriptor,
        inputs: &InputContext,
        log: &CaptureSink,
    ) -> Result<StageResult, StageExecutionError>;
}
