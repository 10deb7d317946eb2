//! Testing utilities for qore pipelines.
//!
//! This module provides:
//! - Scripted and failing executors
//! - Registry fixtures
//! - Assertions for run results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_answer, assert_error_contains, assert_run_failed, assert_run_succeeded};
pub use fixtures::{full_registry, registry_of, stage_descriptor};
pub use mocks::{FailingExecutor, ScriptedExecutor};
