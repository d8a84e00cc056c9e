//! Opaque structured context attached to loggers, metrics and events

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form data describing a process, job or sub-unit of work
///
/// The facade never looks inside a context; backends only print it.
/// Strings print verbatim (`tile:3`), everything else prints as compact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Value);

impl Context {
    /// Wrap an arbitrary JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty mapping, used for loggers created without context
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// Borrow the underlying value
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<Value> for Context {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Context {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl From<String> for Context {
    fn from(s: String) -> Self {
        Self(Value::String(s))
    }
}
