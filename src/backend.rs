//! Backend trait and associated types
//!
//! A backend is a logger factory. The registry keeps one active backend and
//! forwards every `get_logger` call to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::Context;
use crate::error::Result;
use crate::logger::LoggerHandle;

/// Backend-specific configuration metadata
///
/// Empty for backends that have no configuration concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendConfig(BTreeMap<String, Value>);

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Trait for logging backends
///
/// # Object Safety
/// This trait is object-safe to allow `Arc<dyn LoggingBackend>` usage.
pub trait LoggingBackend: Send + Sync {
    /// Which bundled backend this is, or a custom name
    fn name(&self) -> &str;

    /// Create a logger bound to `name` and `context`
    ///
    /// Construction failures are returned to the caller unchanged.
    fn get_logger(&self, name: &str, context: Context) -> Result<LoggerHandle>;

    /// Configuration metadata, empty by default
    fn config(&self) -> BackendConfig {
        BackendConfig::default()
    }
}

/// Bundled backends that can be selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Text lines through `tracing`
    #[default]
    Text,
    /// In-process ring buffer
    Memory,
    /// Timestamped log file
    File,
    /// Discard everything
    Null,
}

impl BackendKind {
    /// Get the display name for this backend kind
    pub fn display_name(&self) -> &str {
        match self {
            BackendKind::Text => "text",
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Null => "null",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggerError;

    // Helper backend that refuses to build loggers
    struct FailingBackend;

    impl LoggingBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn get_logger(&self, name: &str, _context: Context) -> Result<LoggerHandle> {
            Err(LoggerError::Construction {
                name: name.to_string(),
                reason: "out of handles".to_string(),
            })
        }
    }

    #[test]
    fn test_backend_is_object_safe() {
        let backend: Box<dyn LoggingBackend> = Box::new(FailingBackend);
        assert_eq!(backend.name(), "failing");
        assert!(backend.config().is_empty());
        assert!(backend.get_logger("x", Context::empty()).is_err());
    }

    #[test]
    fn test_backend_config_builder() {
        let config = BackendConfig::new()
            .with("path", "/tmp/rh.log")
            .with("capacity", 10);
        assert_eq!(config.get("capacity"), Some(&Value::from(10)));
        assert_eq!(config.iter().count(), 2);
        assert!(!config.is_empty());
    }

    #[test]
    fn test_backend_kind_serialization() {
        for kind in [
            BackendKind::Text,
            BackendKind::Memory,
            BackendKind::File,
            BackendKind::Null,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            let parsed: BackendKind = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_backend_kind_default() {
        assert_eq!(BackendKind::default(), BackendKind::Text);
    }
}
