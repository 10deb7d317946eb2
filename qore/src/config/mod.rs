//! Loading of agent, task and user-profile configuration.
//!
//! The on-disk layout is:
//!
//! ```text
//! <base>/config/agents.yaml
//! <base>/config/tasks.yaml
//! <base>/knowledge/user.json
//! ```
//!
//! Every failure here is a [`ConfigLoadError`] and is fatal at startup.

use crate::errors::ConfigLoadError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Agent definition as written in `agents.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// The agent's role.
    pub role: String,
    /// What the agent is trying to achieve.
    pub goal: String,
    /// Background used to prime the agent.
    #[serde(default)]
    pub backstory: String,
    /// Whether the agent logs verbosely.
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Optional model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<String>,
}

const fn default_verbose() -> bool {
    true
}

/// Task definition as written in `tasks.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Task description template.
    pub description: String,
    /// What a good answer looks like.
    #[serde(default)]
    pub expected_output: String,
    /// Key of the agent assigned to the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// Paths to the three configuration documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Path to `agents.yaml`.
    pub agents: PathBuf,
    /// Path to `tasks.yaml`.
    pub tasks: PathBuf,
    /// Path to the user-profile JSON document.
    pub user_profile: PathBuf,
}

impl ConfigPaths {
    /// Derives the standard layout under `base`.
    #[must_use]
    pub fn from_base_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            agents: base.join("config").join("agents.yaml"),
            tasks: base.join("config").join("tasks.yaml"),
            user_profile: base.join("knowledge").join("user.json"),
        }
    }
}

/// Fully loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QoreConfig {
    /// Agents keyed by their YAML key.
    pub agents: BTreeMap<String, AgentConfig>,
    /// Tasks keyed by their YAML key.
    pub tasks: BTreeMap<String, TaskConfig>,
    /// The user-profile document.
    pub user_profile: serde_json::Value,
    /// Where the configuration was loaded from.
    pub paths: ConfigPaths,
}

impl QoreConfig {
    /// Loads all three documents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if any file is missing or fails to parse.
    pub fn load(paths: ConfigPaths) -> Result<Self, ConfigLoadError> {
        let agents: BTreeMap<String, AgentConfig> = read_yaml(&paths.agents)?;
        let tasks: BTreeMap<String, TaskConfig> = read_yaml(&paths.tasks)?;
        let user_profile = read_json(&paths.user_profile)?;

        info!(
            agents = agents.len(),
            tasks = tasks.len(),
            profile = %paths.user_profile.display(),
            "Loaded configuration"
        );

        Ok(Self {
            agents,
            tasks,
            user_profile,
            paths,
        })
    }

    /// Loads configuration from the standard layout under `base`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if any file is missing or fails to parse.
    pub fn load_from_dir(base: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        Self::load(ConfigPaths::from_base_dir(base))
    }

    /// Looks up an agent that must be present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` naming `agents.yaml` if the key is absent.
    pub fn require_agent(&self, key: &str) -> Result<&AgentConfig, ConfigLoadError> {
        self.agents
            .get(key)
            .ok_or_else(|| ConfigLoadError::missing_key(&self.paths.agents, key))
    }

    /// Looks up a task that must be present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` naming `tasks.yaml` if the key is absent.
    pub fn require_task(&self, key: &str) -> Result<&TaskConfig, ConfigLoadError> {
        self.tasks
            .get(key)
            .ok_or_else(|| ConfigLoadError::missing_key(&self.paths.tasks, key))
    }

    /// Returns the compact JSON form of the user profile.
    #[must_use]
    pub fn user_profile_json(&self) -> String {
        self.user_profile.to_string()
    }
}

fn read_to_string(path: &Path) -> Result<String, ConfigLoadError> {
    if !path.exists() {
        return Err(ConfigLoadError::missing(path));
    }
    debug!(path = %path.display(), "Reading configuration file");
    fs::read_to_string(path).map_err(|e| ConfigLoadError::new(path, e.to_string()))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigLoadError> {
    let content = read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| ConfigLoadError::new(path, format!("invalid YAML: {e}")))
}

fn read_json(path: &Path) -> Result<serde_json::Value, ConfigLoadError> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ConfigLoadError::new(path, format!("invalid JSON: {e}")))
}
