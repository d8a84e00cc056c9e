//! In-memory backend
//!
//! Stores rendered records in a thread-safe ring buffer, so they can be
//! inspected by the process itself (status views, tests).

use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};

use crate::backend::{BackendConfig, LoggingBackend};
use crate::context::Context;
use crate::error::{LoggerError, Result};
use crate::exit_code::ExitCode;
use crate::logger::{Exception, Logger, LoggerHandle};
use crate::metric::MetricValue;
use crate::record::{LogLevel, Record};

/// Default number of entries kept by [`MemoryBackend::default`]
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Default number of alerts kept by [`MemoryBackend::default`]
pub const DEFAULT_ALERT_CAPACITY: usize = 100;

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Timestamp when the log was recorded
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Name of the logger that produced the entry
    pub logger: String,
    /// Log message
    pub message: String,
    /// Trace for in-flight exceptions
    pub trace: Option<String>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            trace: None,
        }
    }

    /// Create an entry from a rendered record
    pub fn from_record(logger: impl Into<String>, record: Record) -> Self {
        Self {
            timestamp: Utc::now(),
            level: record.level,
            logger: logger.into(),
            message: record.message,
            trace: record.trace,
        }
    }
}

fn poisoned<T>(_: T) -> LoggerError {
    LoggerError::SinkPoisoned("memory buffer".to_string())
}

/// Read a lock even if a writer panicked; entries are only ever appended or
/// popped whole, so the last state is still consistent.
fn read_recovering<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|e| {
        tracing::warn!("Log buffer {} lock poisoned, reading last state", what);
        e.into_inner()
    })
}

/// Thread-safe ring buffer for storing log entries
pub struct LogBuffer {
    /// All log entries (capped at max_entries)
    entries: RwLock<VecDeque<LogEntry>>,
    /// Warnings and errors only
    alerts: RwLock<VecDeque<LogEntry>>,
    /// Maximum entries to keep in the main buffer
    max_entries: usize,
    /// Maximum alerts to keep
    max_alerts: usize,
}

impl LogBuffer {
    /// Create a new log buffer with specified capacities
    pub fn new(max_entries: usize, max_alerts: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            alerts: RwLock::new(VecDeque::with_capacity(max_alerts)),
            max_entries,
            max_alerts,
        }
    }

    /// Push a new log entry to the buffer
    ///
    /// Both locks are taken before either buffer changes, so a poisoned lock
    /// leaves entries and alerts untouched.
    pub fn push(&self, entry: LogEntry) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut alerts = if entry.level.is_alert() && self.max_alerts > 0 {
            Some(self.alerts.write().map_err(poisoned)?)
        } else {
            None
        };

        if let Some(alerts) = alerts.as_mut() {
            if alerts.len() >= self.max_alerts {
                alerts.pop_front();
            }
            alerts.push_back(entry.clone());
        }

        if self.max_entries > 0 {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
        Ok(())
    }

    /// Get all entries as a vector
    pub fn all_entries(&self) -> Vec<LogEntry> {
        read_recovering(&self.entries, "entries").iter().cloned().collect()
    }

    /// Messages of all entries, oldest first
    pub fn messages(&self) -> Vec<String> {
        read_recovering(&self.entries, "entries")
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Get the number of entries in the buffer
    pub fn len(&self) -> usize {
        read_recovering(&self.entries, "entries").len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get pending alerts (warnings and errors)
    pub fn pending_alerts(&self) -> Vec<LogEntry> {
        read_recovering(&self.alerts, "alerts").iter().cloned().collect()
    }

    /// Get the number of alerts
    pub fn alert_count(&self) -> usize {
        read_recovering(&self.alerts, "alerts").len()
    }

    /// Clear all alerts (after they've been acknowledged)
    pub fn clear_alerts(&self) {
        let mut alerts = self.alerts.write().unwrap_or_else(|e| {
            tracing::warn!("Log buffer alerts lock poisoned, clearing anyway");
            e.into_inner()
        });
        alerts.clear();
    }
}

/// Backend that keeps every record in a shared [`LogBuffer`]
pub struct MemoryBackend {
    buffer: Arc<LogBuffer>,
}

impl MemoryBackend {
    pub fn new(max_entries: usize, max_alerts: usize) -> Self {
        Self::with_buffer(Arc::new(LogBuffer::new(max_entries, max_alerts)))
    }

    /// Use an existing buffer, e.g. one shared with a viewer
    pub fn with_buffer(buffer: Arc<LogBuffer>) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> Arc<LogBuffer> {
        Arc::clone(&self.buffer)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_ALERT_CAPACITY)
    }
}

impl LoggingBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_logger(&self, name: &str, context: Context) -> Result<LoggerHandle> {
        Ok(Arc::new(MemoryLogger {
            name: name.to_string(),
            context,
            buffer: Arc::clone(&self.buffer),
        }))
    }

    fn config(&self) -> BackendConfig {
        BackendConfig::new()
            .with("capacity", self.buffer.max_entries)
            .with("alert_capacity", self.buffer.max_alerts)
    }
}

/// Logger handed out by [`MemoryBackend`]
pub struct MemoryLogger {
    name: String,
    context: Context,
    buffer: Arc<LogBuffer>,
}

impl MemoryLogger {
    fn emit(&self, record: Record) -> Result<()> {
        self.buffer.push(LogEntry::from_record(&self.name, record))
    }
}

impl Logger for MemoryLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_process(&self, msg: &str) -> Result<()> {
        self.emit(Record::start_process(msg, &self.context))
    }

    fn end_process(&self, msg: &str, exit_code: ExitCode) -> Result<()> {
        self.emit(Record::end_process(msg, exit_code))
    }

    fn report_metric(
        &self,
        name: &str,
        metric: MetricValue,
        subcontext: Option<&Context>,
    ) -> Result<()> {
        self.emit(Record::metric(name, &metric, subcontext))
    }

    fn report_event(&self, event: &str, context: Option<&Context>) -> Result<()> {
        self.emit(Record::event(event, context))
    }

    fn report_exception(&self, exception: Exception<'_>, msg: Option<&str>) -> Result<()> {
        self.emit(Record::exception(&exception, msg))
    }
}
