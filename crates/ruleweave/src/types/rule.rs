use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The definition of a single rule.
///
/// In grammar JSON a rule is a string, an array of strings, or an object
/// naming a handler:
///
/// ```
/// use ruleweave::RuleContents;
///
/// let rule: RuleContents = serde_json::from_str(r#"["cat", "dog"]"#).unwrap();
/// assert_eq!(rule, RuleContents::Choices(vec!["cat".into(), "dog".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleContents {
    /// Expands to this text verbatim.
    Text(String),
    /// Expands to one alternative chosen by the grammar's sampler.
    Choices(Vec<String>),
    /// Expands through the object handler named by its `handler` field.
    Object(Map<String, Value>),
}

impl RuleContents {
    /// The handler name of an object rule, if it has a string `handler` field.
    pub fn handler_name(&self) -> Option<&str> {
        match self {
            RuleContents::Object(object) => object.get("handler").and_then(Value::as_str),
            RuleContents::Text(_) | RuleContents::Choices(_) => None,
        }
    }

    /// Every string this rule can produce directly, without running a handler.
    ///
    /// For object rules this is every string value except the handler name,
    /// including strings nested in arrays.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            RuleContents::Text(text) => vec![text.as_str()],
            RuleContents::Choices(choices) => choices.iter().map(String::as_str).collect(),
            RuleContents::Object(object) => {
                let mut texts = Vec::new();
                for (field, value) in object {
                    if field != "handler" {
                        collect_strings(value, &mut texts);
                    }
                }
                texts
            }
        }
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(text) => out.push(text),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        Value::Object(fields) => {
            for nested in fields.values() {
                collect_strings(nested, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

impl From<String> for RuleContents {
    fn from(text: String) -> Self {
        RuleContents::Text(text)
    }
}

impl From<&str> for RuleContents {
    fn from(text: &str) -> Self {
        RuleContents::Text(text.to_string())
    }
}

impl From<Vec<String>> for RuleContents {
    fn from(choices: Vec<String>) -> Self {
        RuleContents::Choices(choices)
    }
}

impl From<Vec<&str>> for RuleContents {
    fn from(choices: Vec<&str>) -> Self {
        RuleContents::Choices(choices.into_iter().map(str::to_string).collect())
    }
}

impl From<Map<String, Value>> for RuleContents {
    fn from(object: Map<String, Value>) -> Self {
        RuleContents::Object(object)
    }
}
