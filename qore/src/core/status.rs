//! Stage kind and run status enums.

use crate::errors::UnknownStageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of analysis a stage performs.
///
/// Variants are declared in pipeline order, so the derived `Ord` matches
/// the order of the generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Income and spending flow analysis.
    CashFlow,
    /// Budget allocation review.
    Budget,
    /// Savings goals and progress.
    Savings,
    /// Overall insights referencing the earlier findings.
    Insights,
}

impl StageKind {
    /// Every stage kind in the order the full pipeline runs them.
    pub const PIPELINE_ORDER: [Self; 4] = [Self::CashFlow, Self::Budget, Self::Savings, Self::Insights];

    /// Returns the canonical identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CashFlow => "cash_flow",
            Self::Budget => "budget",
            Self::Savings => "savings",
            Self::Insights => "insights",
        }
    }

    /// Returns the key of this stage's agent in `agents.yaml`.
    #[must_use]
    pub fn agent_key(&self) -> String {
        format!("{}_agent", self.as_str())
    }

    /// Returns the key of this stage's task in `tasks.yaml`.
    #[must_use]
    pub fn task_key(&self) -> String {
        format!("{}_task", self.as_str())
    }

    /// Returns all canonical identifiers in pipeline order.
    #[must_use]
    pub fn identifiers() -> Vec<String> {
        Self::PIPELINE_ORDER.iter().map(|k| k.as_str().to_string()).collect()
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = UnknownStageError;

    /// Parses a stage identifier.
    ///
    /// Accepts the canonical form, the hyphenated and joined spellings of
    /// `cash_flow`, and the `<id>_agent` form used by front ends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let base = normalized.strip_suffix("_agent").unwrap_or(&normalized);

        match base {
            "cash_flow" | "cashflow" => Ok(Self::CashFlow),
            "budget" => Ok(Self::Budget),
            "savings" => Ok(Self::Savings),
            "insights" => Ok(Self::Insights),
            _ => Err(UnknownStageError::new(s, Self::identifiers())),
        }
    }
}

/// The outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run produced an answer.
    Success,
    /// The run failed; the output carries the diagnostic.
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl RunStatus {
    /// Returns true if the status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
