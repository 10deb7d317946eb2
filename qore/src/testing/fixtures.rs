//! Registry fixtures.

use crate::core::StageKind;
use crate::registry::{AgentDescriptor, StageDescriptor, StageRegistry, TaskDescriptor};

/// Builds a descriptor for `kind` with a templated task description.
#[must_use]
pub fn stage_descriptor(kind: StageKind) -> StageDescriptor {
    StageDescriptor::new(
        kind,
        AgentDescriptor::new(kind.agent_key(), format!("{kind} analyst")),
        TaskDescriptor::new(kind.task_key(), format!("Analyze {kind} for {{current_year}}")),
    )
}

/// Builds a registry holding `kinds` in the given order.
///
/// # Panics
///
/// Panics if `kinds` contains duplicates.
#[must_use]
#[allow(clippy::expect_used)]
pub fn registry_of(kinds: &[StageKind]) -> StageRegistry {
    let mut registry = StageRegistry::new();
    for kind in kinds {
        registry
            .register(stage_descriptor(*kind))
            .expect("duplicate stage in fixture");
    }
    registry
}

/// Builds a registry holding every stage in pipeline order.
#[must_use]
pub fn full_registry() -> StageRegistry {
    registry_of(&StageKind::PIPELINE_ORDER)
}
