//! Configuration management for rh-logger
//!
//! Settings decide which bundled backend a process starts with. They are
//! read from `~/.rh_logger/config.toml` unless a path is given explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendKind, LoggingBackend};
use crate::backends::retention::{cleanup_old_logs_with_retention, DEFAULT_RETENTION_DAYS};
use crate::backends::{memory, FileBackend, MemoryBackend, NullBackend, TextBackend};

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Backend selected at startup: "text" (default), "memory", "file" or "null"
    #[serde(default)]
    pub backend: BackendKind,

    /// Default `tracing` filter when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Directory for the file backend's log files
    #[serde(default = "logs_dir")]
    pub logs_dir: PathBuf,

    /// Log files older than this many days are removed when the file backend starts
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// Entries kept by the memory backend
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Warnings and errors kept by the memory backend
    #[serde(default = "default_memory_alert_capacity")]
    pub memory_alert_capacity: usize,
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

fn default_memory_capacity() -> usize {
    memory::DEFAULT_CAPACITY
}

fn default_memory_alert_capacity() -> usize {
    memory::DEFAULT_ALERT_CAPACITY
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            filter: default_filter(),
            logs_dir: logs_dir(),
            retention_days: default_retention_days(),
            memory_capacity: default_memory_capacity(),
            memory_alert_capacity: default_memory_alert_capacity(),
        }
    }
}

impl LoggingSettings {
    /// Load settings from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
        self.save_to(&config_file_path())
    }

    /// Save settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Construct the configured backend
    ///
    /// For the file backend this creates the logs directory and removes
    /// expired log files first.
    pub fn build_backend(&self) -> Result<Arc<dyn LoggingBackend>> {
        let backend: Arc<dyn LoggingBackend> = match self.backend {
            BackendKind::Text => Arc::new(TextBackend::new()),
            BackendKind::Memory => Arc::new(MemoryBackend::new(
                self.memory_capacity,
                self.memory_alert_capacity,
            )),
            BackendKind::File => {
                std::fs::create_dir_all(&self.logs_dir)
                    .context("Failed to create logs directory")?;
                match cleanup_old_logs_with_retention(&self.logs_dir, self.retention_days) {
                    Ok(count) if count > 0 => {
                        tracing::info!("Cleaned up {} old log files", count);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Log retention cleanup failed: {:#}", e),
                }
                let backend =
                    FileBackend::create(&self.logs_dir).context("Failed to open log file")?;
                tracing::info!("Logging to: {}", backend.path().display());
                Arc::new(backend)
            }
            BackendKind::Null => Arc::new(NullBackend),
        };
        Ok(backend)
    }
}

/// Get the base configuration directory (~/.rh_logger)
/// Falls back to ./.rh_logger if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".rh_logger")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rh_logger"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the default logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}
