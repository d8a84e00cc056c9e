//! Backend registry and logger factory
//!
//! A [`LoggingRegistry`] owns the active backend. Composition roots can
//! create and pass their own registry; code that prefers "set once, read
//! everywhere" uses the process-wide instance through the free functions at
//! the bottom of this module.
//!
//! Loggers keep the backend that created them. Switching backends only
//! affects loggers requested afterwards.

use std::sync::{Arc, OnceLock, RwLock};

use crate::backend::{BackendConfig, LoggingBackend};
use crate::backends::TextBackend;
use crate::config::LoggingSettings;
use crate::context::Context;
use crate::error::Result;
use crate::logger::LoggerHandle;

/// Name of the default logger returned by [`LoggingRegistry::default_logger`]
pub const DEFAULT_LOGGER_NAME: &str = "rh_logger";

/// Holds the active backend and builds loggers from it
pub struct LoggingRegistry {
    backend: RwLock<Arc<dyn LoggingBackend>>,
    default_logger: OnceLock<LoggerHandle>,
}

impl LoggingRegistry {
    /// Create a registry with `backend` active
    pub fn new(backend: Arc<dyn LoggingBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
            default_logger: OnceLock::new(),
        }
    }

    /// Create a registry with the backend chosen by `settings`
    pub fn from_settings(settings: &LoggingSettings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.build_backend()?))
    }

    /// Replace the active backend
    ///
    /// Loggers already handed out keep their original backend.
    pub fn set_logging_backend(&self, backend: Arc<dyn LoggingBackend>) {
        tracing::debug!(backend = backend.name(), "Switching logging backend");
        // A poisoned slot still holds a valid Arc; overwrite it
        let mut slot = self.backend.write().unwrap_or_else(|e| e.into_inner());
        *slot = backend;
    }

    /// Get the active backend
    pub fn get_logging_backend(&self) -> Arc<dyn LoggingBackend> {
        let slot = self.backend.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&slot)
    }

    /// Configuration metadata of the active backend, empty if it has none
    pub fn get_logging_config(&self) -> BackendConfig {
        self.get_logging_backend().config()
    }

    /// Create a logger through the active backend
    ///
    /// Construction errors from the backend are returned unchanged.
    pub fn get_logger(&self, name: &str, context: Context) -> Result<LoggerHandle> {
        self.get_logging_backend().get_logger(name, context)
    }

    /// The registry's default logger, created on first use
    ///
    /// It is bound to whichever backend is active at that first call and
    /// never rebuilt afterwards.
    pub fn default_logger(&self) -> Result<LoggerHandle> {
        if let Some(logger) = self.default_logger.get() {
            return Ok(Arc::clone(logger));
        }
        let logger = self.get_logger(DEFAULT_LOGGER_NAME, Context::empty())?;
        // If another thread won the race, use its logger
        Ok(Arc::clone(self.default_logger.get_or_init(|| logger)))
    }
}

impl Default for LoggingRegistry {
    fn default() -> Self {
        Self::new(Arc::new(TextBackend::new()))
    }
}

/// Process-wide registry, starting with the text backend
static REGISTRY: OnceLock<LoggingRegistry> = OnceLock::new();

/// Get the process-wide registry
pub fn registry() -> &'static LoggingRegistry {
    REGISTRY.get_or_init(LoggingRegistry::default)
}

/// Replace the process-wide active backend
///
/// Meant to be called once during startup, before loggers are requested.
pub fn set_logging_backend(backend: Arc<dyn LoggingBackend>) {
    registry().set_logging_backend(backend)
}

/// Get the process-wide active backend
pub fn get_logging_backend() -> Arc<dyn LoggingBackend> {
    registry().get_logging_backend()
}

/// Configuration metadata of the process-wide active backend
pub fn get_logging_config() -> BackendConfig {
    registry().get_logging_config()
}

/// Create a logger through the process-wide active backend
pub fn get_logger(name: &str, context: impl Into<Context>) -> Result<LoggerHandle> {
    registry().get_logger(name, context.into())
}

/// The process-wide default logger
pub fn logger() -> Result<LoggerHandle> {
    registry().default_logger()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{FileBackend, MemoryBackend, NullBackend};
    use crate::error::LoggerError;
    use crate::exit_code::ExitCode;
    use crate::logger::Exception;
    use serde_json::json;

    fn memory_registry() -> (LoggingRegistry, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new(100, 10));
        let registry = LoggingRegistry::new(backend.clone());
        (registry, backend)
    }

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
    fn test_default_registry_uses_text_backend() {
        let registry = LoggingRegistry::default();
        assert_eq!(registry.get_logging_backend().name(), "text");
        assert!(registry.get_logging_config().is_empty());
    }

    #[test]
    fn test_get_logging_backend_is_stable() {
        let (registry, _) = memory_registry();
        let first = registry.get_logging_backend();
        let second = registry.get_logging_backend();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_set_logging_backend_replaces_backend() {
        let (registry, _) = memory_registry();
        registry.set_logging_backend(Arc::new(NullBackend));
        assert_eq!(registry.get_logging_backend().name(), "null");
        assert!(registry.get_logging_config().is_empty());
    }

    #[test]
    fn test_logger_stays_bound_to_original_backend() {
        let (registry, original) = memory_registry();
        let logger = registry.get_logger("x", Context::empty()).unwrap();

        let replacement = Arc::new(MemoryBackend::new(100, 10));
        registry.set_logging_backend(replacement.clone());
        logger.report_event("e", None).unwrap();

        assert_eq!(original.buffer().messages(), vec!["e"]);
        assert!(replacement.buffer().is_empty());

        let fresh = registry.get_logger("y", Context::empty()).unwrap();
        fresh.report_event("f", None).unwrap();
        assert_eq!(replacement.buffer().messages(), vec!["f"]);
    }

    #[test]
    fn test_well_formed_names_and_contexts_never_fail() {
        let (registry, backend) = memory_registry();
        let contexts = [
            Context::empty(),
            Context::from("job 12"),
            Context::new(json!({"mfov": 5, "tiles": [1, 2, 3]})),
            Context::new(json!(["--input", "a.h5", 3])),
            Context::new(json!(null)),
        ];

        for (i, context) in contexts.into_iter().enumerate() {
            let name = format!("worker-{}", i);
            let logger = registry.get_logger(&name, context.clone()).unwrap();
            logger.start_process("go").unwrap();
            logger.report_metric("n", (i as i64).into(), Some(&context)).unwrap();
            logger.report_event("tick", Some(&context)).unwrap();
            let err = std::io::Error::new(std::io::ErrorKind::Other, "bad");
            logger.report_exception(Exception::error(&err), None).unwrap();
            logger.end_process("stop", ExitCode::Success).unwrap();
        }
        assert_eq!(backend.buffer().len(), 25);
    }

    #[test]
    fn test_construction_failure_propagates() {
        let registry = LoggingRegistry::new(Arc::new(FailingBackend));
        let err = registry.get_logger("align", Context::empty()).err().unwrap();
        assert!(matches!(
            err,
            LoggerError::Construction { ref name, .. } if name == "align"
        ));
        assert!(registry.default_logger().is_err());
    }

    #[test]
    fn test_default_logger_created_once() {
        let (registry, original) = memory_registry();
        let first = registry.default_logger().unwrap();
        registry.set_logging_backend(Arc::new(NullBackend));
        let second = registry.default_logger().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.name(), DEFAULT_LOGGER_NAME);

        second.report_event("still here", None).unwrap();
        assert_eq!(original.buffer().messages(), vec!["still here"]);
    }

    #[test]
    fn test_get_logging_config_follows_backend() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("run.log");
        let registry = LoggingRegistry::new(Arc::new(FileBackend::open(&path).unwrap()));
        assert_eq!(
            registry.get_logging_config().get("path"),
            Some(&json!(path.display().to_string()))
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            backend: crate::backend::BackendKind::Memory,
            ..LoggingSettings::default()
        };
        let registry = LoggingRegistry::from_settings(&settings).unwrap();
        assert_eq!(registry.get_logging_backend().name(), "memory");
    }

    // The only test touching the process-wide registry
    #[test]
    fn test_process_wide_registry() {
        let first = get_logging_backend();
        let second = get_logging_backend();
        assert!(Arc::ptr_eq(&first, &second));

        let backend = Arc::new(MemoryBackend::new(100, 10));
        set_logging_backend(backend.clone());
        assert_eq!(get_logging_backend().name(), "memory");
        assert_eq!(get_logging_config().get("capacity"), Some(&json!(100)));

        let job = get_logger("job", json!({"id": 1})).unwrap();
        job.report_metric("rand_score", 0.94.into(), None).unwrap();
        logger().unwrap().report_event("ready", None).unwrap();

        assert_eq!(backend.buffer().messages(), vec!["rand_score=0.94", "ready"]);
    }
}
