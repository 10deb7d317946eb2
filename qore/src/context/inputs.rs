//! Shared, read-only inputs for a pipeline run.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Named values supplied to every stage's task description.
///
/// An `InputContext` is built once per run and only ever borrowed by the
/// runner and executors, so stages cannot mutate it mid-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputContext {
    fields: BTreeMap<String, String>,
}

impl InputContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default financial-report context for the given year.
    #[must_use]
    pub fn financial_defaults(current_year: i32) -> Self {
        Self::new()
            .with("topic", "Financial Management")
            .with("current_year", current_year.to_string())
            .with("cash_flow", "...")
            .with("budget", "...")
            .with("savings", "...")
    }

    /// Creates the default financial-report context for the current year.
    #[must_use]
    pub fn for_current_year() -> Self {
        use chrono::Datelike;
        Self::financial_defaults(chrono::Local::now().year())
    }

    /// Adds a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Gets a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitutes `{field}` placeholders in `template` with field values.
    ///
    /// Only identifier-shaped placeholders naming a known field are
    /// replaced; anything else (including JSON braces) is kept verbatim.
    #[must_use]
    pub fn interpolate(&self, template: &str) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &Captures<'_>| {
                self.get(&caps[1])
                    .map_or_else(|| caps[0].to_string(), str::to_string)
            })
            .into_owned()
    }
}

impl<K, V> FromIterator<(K, V)> for InputContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[allow(clippy::expect_used)]
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid regex for placeholders")
    })
}
