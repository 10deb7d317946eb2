//! Stage, agent and task descriptors.

use crate::config::{AgentConfig, TaskConfig};
use crate::context::InputContext;
use crate::core::StageKind;
use serde::{Deserialize, Serialize};

/// The agent half of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Key of the agent in `agents.yaml`.
    pub key: String,
    /// The agent's role.
    pub role: String,
    /// The agent's goal.
    pub goal: String,
    /// The agent's backstory.
    pub backstory: String,
    /// Whether the agent logs verbosely.
    pub verbose: bool,
    /// Optional model override.
    pub llm: Option<String>,
}

impl AgentDescriptor {
    /// Creates an agent descriptor from its config entry.
    #[must_use]
    pub fn from_config(key: impl Into<String>, config: &AgentConfig) -> Self {
        Self {
            key: key.into(),
            role: config.role.clone(),
            goal: config.goal.clone(),
            backstory: config.backstory.clone(),
            verbose: config.verbose,
            llm: config.llm.clone(),
        }
    }

    /// Creates a minimal agent descriptor.
    #[must_use]
    pub fn new(key: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            verbose: true,
            llm: None,
        }
    }
}

/// The task half of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Key of the task in `tasks.yaml`.
    pub key: String,
    /// Description template, including the user-profile suffix.
    pub description: String,
    /// What a good answer looks like.
    pub expected_output: String,
}

impl TaskDescriptor {
    /// Creates a task descriptor from its config entry, appending the
    /// user profile to the description.
    #[must_use]
    pub fn from_config(key: impl Into<String>, config: &TaskConfig, user_profile_json: &str) -> Self {
        Self {
            key: key.into(),
            description: format!("{}\n\nUser Profile: {user_profile_json}", config.description),
            expected_output: config.expected_output.clone(),
        }
    }

    /// Creates a task descriptor with a literal description.
    #[must_use]
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            expected_output: String::new(),
        }
    }

    /// Renders the description against the run's inputs.
    #[must_use]
    pub fn render(&self, inputs: &InputContext) -> String {
        inputs.interpolate(&self.description)
    }
}

/// A registered stage: one agent paired with one task.
///
/// Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Which stage this is.
    pub kind: StageKind,
    /// The agent that performs the task.
    pub agent: AgentDescriptor,
    /// The task to perform.
    pub task: TaskDescriptor,
}

impl StageDescriptor {
    /// Creates a new stage descriptor.
    #[must_use]
    pub fn new(kind: StageKind, agent: AgentDescriptor, task: TaskDescriptor) -> Self {
        Self { kind, agent, task }
    }

    /// Returns the canonical stage identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_from_config_appends_profile() {
        let config = TaskConfig {
            description: "Review the budget for {current_year}.".to_string(),
            expected_output: "Bullets".to_string(),
            agent: None,
        };
        let task = TaskDescriptor::from_config("budget_task", &config, r#"{"name":"Ana"}"#);

        assert_eq!(
            task.description,
            "Review the budget for {current_year}.\n\nUser Profile: {\"name\":\"Ana\"}"
        );
        assert_eq!(task.expected_output, "Bullets");
    }

    #[test]
    fn test_task_render() {
        let task = TaskDescriptor::new("budget_task", "Budget for {current_year}: {budget}");
        let inputs = InputContext::financial_defaults(2025);

        assert_eq!(task.render(&inputs), "Budget for 2025: ...");
    }

    #[test]
    fn test_agent_from_config() {
        let config = AgentConfig {
            role: "Budget planner".to_string(),
            goal: "Allocate income".to_string(),
            backstory: String::new(),
            verbose: false,
            llm: Some("gpt-4o".to_string()),
        };
        let agent = AgentDescriptor::from_config("budget_agent", &config);

        assert_eq!(agent.key, "budget_agent");
        assert_eq!(agent.role, "Budget planner");
        assert!(!agent.verbose);
        assert_eq!(agent.llm.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_stage_descriptor_id() {
        let stage = StageDescriptor::new(
            StageKind::CashFlow,
            AgentDescriptor::new("cash_flow_agent", "Analyst"),
            TaskDescriptor::new("cash_flow_task", "Analyze"),
        );
        assert_eq!(stage.id(), "cash_flow");
    }
}
