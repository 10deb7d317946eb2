//! Shapes an executor may hand back, and their conversion to raw text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping keys checked, in order, for the real answer text.
pub const OUTPUT_KEYS: &[&str] = &["output", "result", "final_output"];

/// An object exposing an `output` accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// The output accessor, if the object has one set.
    pub output: Option<String>,
    /// The rest of the object.
    #[serde(default)]
    pub fields: Value,
}

impl TaskOutput {
    /// Creates a task output with an `output` value.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            fields: Value::Null,
        }
    }

    /// Creates a task output without an `output` value.
    #[must_use]
    pub fn without_output(fields: Value) -> Self {
        Self {
            output: None,
            fields,
        }
    }
}

/// What an executor produced for a stage.
///
/// The upstream shape is not controlled by this crate, so every shape
/// seen so far has a variant here and [`StageResult::into_raw_output`]
/// flattens them to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StageResult {
    /// Plain text.
    Text(String),
    /// A key/value mapping with the answer under a conventional key.
    Mapping(Map<String, Value>),
    /// An object exposing an `output` accessor.
    Object(TaskOutput),
    /// Any other structured value.
    Value(Value),
}

impl StageResult {
    /// Parses executor stdout: a JSON object becomes a mapping,
    /// anything else stays text.
    #[must_use]
    pub fn from_stdout(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        if trimmed.starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                return Self::Mapping(map);
            }
        }
        Self::Text(stdout.to_string())
    }

    /// Flattens the result to the text handed to extraction.
    ///
    /// Best-effort precedence, kept stable for callers that depend on it:
    ///
    /// 1. mapping: the first of `output`, `result`, `final_output` present
    /// 2. mapping: otherwise the first string value in iteration order
    /// 3. mapping: otherwise the whole mapping as JSON
    /// 4. object: its `output` accessor when set
    /// 5. anything else: the whole value as text
    ///
    /// Nothing guarantees the chosen text is the real answer.
    #[must_use]
    pub fn into_raw_output(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Mapping(map) => mapping_text(map),
            Self::Object(TaskOutput {
                output: Some(output),
                ..
            }) => output,
            Self::Object(TaskOutput { output: None, fields }) => value_text(fields),
            Self::Value(Value::Object(map)) => mapping_text(map),
            Self::Value(value) => value_text(value),
        }
    }
}

fn mapping_text(mut map: Map<String, Value>) -> String {
    for key in OUTPUT_KEYS {
        if let Some(value) = map.remove(*key) {
            return value_text(value);
        }
    }

    if let Some(text) = map.values().find_map(Value::as_str) {
        return text.to_string();
    }

    Value::Object(map).to_string()
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<String> for StageResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for StageResult {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for StageResult {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(map) => Self::Mapping(map),
            other => Self::Value(other),
        }
    }
}

impl From<TaskOutput> for StageResult {
    fn from(output: TaskOutput) -> Self {
        Self::Object(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapping(value: Value) -> StageResult {
        match value {
            Value::Object(map) => StageResult::Mapping(map),
            _ => unreachable!("test helper expects an object"),
        }
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(StageResult::from("- item").into_raw_output(), "- item");
    }

    #[test]
    fn test_mapping_key_precedence() {
        let result = mapping(json!({
            "final_output": "third",
            "result": "second",
            "output": "first",
        }));
        assert_eq!(result.into_raw_output(), "first");

        let result = mapping(json!({"final_output": "third", "result": "second"}));
        assert_eq!(result.into_raw_output(), "second");

        let result = mapping(json!({"summary": "x", "final_output": "third"}));
        assert_eq!(result.into_raw_output(), "third");
    }

    #[test]
    fn test_mapping_non_string_output_value() {
        let result = mapping(json!({"output": ["- a", "- b"]}));
        assert_eq!(result.into_raw_output(), r#"["- a","- b"]"#);
    }

    #[test]
    fn test_mapping_first_string_value() {
        let result = mapping(json!({
            "score": 3,
            "summary": "Spending is stable",
            "detail": "ignored",
        }));
        assert_eq!(result.into_raw_output(), "Spending is stable");
    }

    #[test]
    fn test_mapping_stringified_when_no_strings() {
        let result = mapping(json!({"score": 3, "ok": true}));
        assert_eq!(result.into_raw_output(), r#"{"score":3,"ok":true}"#);
    }

    #[test]
    fn test_object_output_accessor() {
        let result = StageResult::from(TaskOutput {
            output: Some("Net savings: $200".to_string()),
            fields: json!({"raw": "ignored"}),
        });
        assert_eq!(result.into_raw_output(), "Net savings: $200");
    }

    #[test]
    fn test_object_without_output_is_stringified() {
        let result = StageResult::from(TaskOutput::without_output(json!({"raw": 1})));
        assert_eq!(result.into_raw_output(), r#"{"raw":1}"#);
    }

    #[test]
    fn test_other_values_stringified() {
        assert_eq!(StageResult::from(json!(42)).into_raw_output(), "42");
        assert_eq!(StageResult::from(json!(["a"])).into_raw_output(), r#"["a"]"#);
        assert_eq!(StageResult::Value(json!("s")).into_raw_output(), "s");
        assert_eq!(StageResult::Value(json!({"result": "r"})).into_raw_output(), "r");
    }

    #[test]
    fn test_from_value_routes_objects_to_mapping() {
        assert!(matches!(StageResult::from(json!({"a": 1})), StageResult::Mapping(_)));
        assert!(matches!(StageResult::from(json!("x")), StageResult::Text(_)));
    }

    #[test]
    fn test_from_stdout() {
        assert_eq!(
            StageResult::from_stdout("  {\"output\": \"- a\"}\n").into_raw_output(),
            "- a"
        );
        assert_eq!(
            StageResult::from_stdout("{not json\n- a"),
            StageResult::Text("{not json\n- a".to_string())
        );
        assert_eq!(
            StageResult::from_stdout("Crew Started\n- a"),
            StageResult::Text("Crew Started\n- a".to_string())
        );
    }
}
