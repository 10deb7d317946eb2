//! Pipeline execution.
//!
//! [`PipelineRunner`] resolves stages from the registry, hands them to the
//! executor strictly one at a time and runs the result through the
//! extraction engine.

mod runner;

pub use runner::PipelineRunner;
