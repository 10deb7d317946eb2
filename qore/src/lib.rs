//! # Qore
//!
//! Runs the Qore financial crew: a fixed set of agents, each paired with a
//! task, executed in report order (cash flow, budget, savings, insights).
//! Agent output arrives mixed with colored framework logs; qore extracts
//! the single meaningful answer and returns it with a status.
//!
//! - **Registry**: stage kinds mapped to agent/task descriptors, loaded once
//!   from `agents.yaml`, `tasks.yaml` and the user profile
//! - **Pipeline**: `run_stage` for one stage, `run_all` for every stage in
//!   order; both always return a [`RunResult`](core::RunResult)
//! - **Extraction**: a total, tiered heuristic over noisy text
//! - **Capture**: per-run output buffers, never a process-wide redirect
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qore::prelude::*;
//! use std::sync::Arc;
//!
//! let config = QoreConfig::load_from_dir("./qore")?;
//! let registry = Arc::new(StageRegistry::from_config(&config)?);
//! let executor = Arc::new(CommandExecutor::new("python").with_args(["main.py", "run"]));
//!
//! let runner = PipelineRunner::new(registry.clone(), executor);
//! let result = runner.run_stage("budget", registry.inputs_template()).await;
//! println!("{}: {}", result.status, result.output);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod capture;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod executor;
pub mod extraction;
pub mod pipeline;
pub mod registry;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capture::{CaptureSink, OutputCapture};
    pub use crate::config::{ConfigPaths, QoreConfig};
    pub use crate::context::InputContext;
    pub use crate::core::{RunResult, RunStatus, StageKind};
    pub use crate::errors::{
        ConfigLoadError, QoreError, StageExecutionError, UnknownStageError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::executor::{CommandExecutor, StageExecutor, StageResult, TaskOutput};
    pub use crate::extraction::{extract, Extraction, ExtractionEngine, ExtractionTier};
    pub use crate::pipeline::PipelineRunner;
    pub use crate::registry::{
        AgentDescriptor, StageDescriptor, StageRegistry, TaskDescriptor,
    };
}
