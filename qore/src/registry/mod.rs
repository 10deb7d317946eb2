//! Stage registry.
//!
//! Maps each [`StageKind`] to its agent/task pair. The registry is built
//! once at startup and is a pure lookup afterwards.

mod descriptor;

pub use descriptor::{AgentDescriptor, StageDescriptor, TaskDescriptor};

use crate::config::QoreConfig;
use crate::context::InputContext;
use crate::core::StageKind;
use crate::errors::{ConfigLoadError, UnknownStageError};
use tracing::debug;

/// Registry of stages in registration order.
#[derive(Debug, Clone, Default)]
pub struct StageRegistry {
    stages: Vec<StageDescriptor>,
    inputs_template: InputContext,
}

impl StageRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from loaded configuration.
    ///
    /// Registers every stage kind in pipeline order. The inputs template
    /// defaults to the financial-report context for the current year.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if an expected agent or task is missing.
    pub fn from_config(config: &QoreConfig) -> Result<Self, ConfigLoadError> {
        let profile = config.user_profile_json();
        let mut registry = Self::new().with_inputs_template(InputContext::for_current_year());

        for kind in StageKind::PIPELINE_ORDER {
            let task_key = kind.task_key();
            let task_config = config.require_task(&task_key)?;

            let agent_key = task_config.agent.clone().unwrap_or_else(|| kind.agent_key());
            let agent_config = config.require_agent(&agent_key)?;

            registry.register(StageDescriptor::new(
                kind,
                AgentDescriptor::from_config(agent_key, agent_config),
                TaskDescriptor::from_config(task_key, task_config, &profile),
            ))?;
        }

        Ok(registry)
    }

    /// Sets the template used to build each run's inputs.
    #[must_use]
    pub fn with_inputs_template(mut self, inputs: InputContext) -> Self {
        self.inputs_template = inputs;
        self
    }

    /// Registers a stage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if the stage kind is already registered.
    pub fn register(&mut self, stage: StageDescriptor) -> Result<&mut Self, ConfigLoadError> {
        if self.get(stage.kind).is_some() {
            return Err(ConfigLoadError::new(
                "stage registry",
                format!("stage '{}' registered twice", stage.kind),
            ));
        }
        debug!(stage = %stage.kind, agent = %stage.agent.key, task = %stage.task.key, "Registered stage");
        self.stages.push(stage);
        Ok(self)
    }

    /// Resolves a stage identifier.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStageError` if the identifier does not name a
    /// registered stage.
    pub fn resolve(&self, stage_id: &str) -> Result<&StageDescriptor, UnknownStageError> {
        let kind: StageKind = stage_id
            .parse()
            .map_err(|_| UnknownStageError::new(stage_id, self.identifiers()))?;

        self.get(kind)
            .ok_or_else(|| UnknownStageError::new(stage_id, self.identifiers()))
    }

    /// Gets a stage by kind.
    #[must_use]
    pub fn get(&self, kind: StageKind) -> Option<&StageDescriptor> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    /// Iterates over stages in registration order.
    pub fn stages(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.iter()
    }

    /// Returns registered identifiers in registration order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.id().to_string()).collect()
    }

    /// Returns the inputs template.
    #[must_use]
    pub fn inputs_template(&self) -> &InputContext {
        &self.inputs_template
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stages are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{write_config, AGENTS_YAML, TASKS_YAML, USER_JSON};
    use pretty_assertions::assert_eq;

    fn stage(kind: StageKind) -> StageDescriptor {
        StageDescriptor::new(
            kind,
            AgentDescriptor::new(kind.agent_key(), "analyst"),
            TaskDescriptor::new(kind.task_key(), format!("Do the {kind} work")),
        )
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = StageRegistry::new();
        registry.register(stage(StageKind::Budget)).unwrap();
        registry.register(stage(StageKind::Savings)).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("budget").unwrap().kind, StageKind::Budget);
        assert_eq!(registry.resolve("savings_agent").unwrap().kind, StageKind::Savings);
    }

    #[test]
    fn test_resolve_unknown_identifier() {
        let mut registry = StageRegistry::new();
        registry.register(stage(StageKind::Budget)).unwrap();

        let err = registry.resolve("taxes").unwrap_err();
        assert_eq!(err.stage_id, "taxes");
        assert_eq!(err.known, vec!["budget".to_string()]);
    }

    #[test]
    fn test_resolve_known_kind_not_registered() {
        let mut registry = StageRegistry::new();
        registry.register(stage(StageKind::Budget)).unwrap();

        let err = registry.resolve("insights").unwrap_err();
        assert_eq!(err.stage_id, "insights");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = StageRegistry::new();
        registry.register(stage(StageKind::Budget)).unwrap();

        let err = registry.register(stage(StageKind::Budget)).unwrap_err();
        assert!(err.message.contains("registered twice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = StageRegistry::new();
        registry
            .register(stage(StageKind::Insights))
            .unwrap()
            .register(stage(StageKind::CashFlow))
            .unwrap();

        assert_eq!(registry.identifiers(), vec!["insights", "cash_flow"]);
    }

    #[test]
    fn test_from_config() {
        let dir = write_config(AGENTS_YAML, TASKS_YAML, Some(USER_JSON));
        let config = QoreConfig::load_from_dir(dir.path()).unwrap();
        let registry = StageRegistry::from_config(&config).unwrap();

        assert_eq!(
            registry.identifiers(),
            vec!["cash_flow", "budget", "savings", "insights"]
        );

        let budget = registry.resolve("budget").unwrap();
        assert_eq!(budget.agent.role, "Budget planner");
        assert!(budget.task.description.starts_with("Review the budget ({budget})."));
        assert!(budget
            .task
            .description
            .ends_with(r#"User Profile: {"user":{"name":"Ana","monthly_income":50000}}"#));

        assert!(registry.inputs_template().contains("current_year"));
    }

    #[test]
    fn test_from_config_missing_task() {
        let tasks = TASKS_YAML.replace("savings_task", "other_task");
        let dir = write_config(AGENTS_YAML, &tasks, Some(USER_JSON));
        let config = QoreConfig::load_from_dir(dir.path()).unwrap();

        let err = StageRegistry::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("'savings_task'"));
    }
}
