//! Core domain model types for qore.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage kind and run status enums
//! - The run result returned to callers

mod output;
#[cfg(test)]
mod output_tests;
mod status;

pub use output::RunResult;
pub use status::{RunStatus, StageKind};
