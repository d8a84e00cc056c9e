//! File backend
//!
//! Appends one line per record to a timestamped log file. Traces and
//! multi-line messages continue on indented lines below the record, one per
//! `\n`-separated segment, so trailing newlines and `\r` survive a read back.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, SecondsFormat, Utc};

use super::memory::LogEntry;
use crate::backend::{BackendConfig, LoggingBackend};
use crate::context::Context;
use crate::error::{LoggerError, Result};
use crate::exit_code::ExitCode;
use crate::logger::{Exception, Logger, LoggerHandle};
use crate::metric::MetricValue;
use crate::record::{LogLevel, Record};

/// Prefix of every log file this backend creates
pub const LOG_FILE_PREFIX: &str = "rh-logger-";

const MESSAGE_CONTINUATION: &str = "    > ";
const TRACE_CONTINUATION: &str = "    | ";

/// Generate a timestamped log file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    logs_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, timestamp))
}

/// Backend writing to a single append-only file
///
/// All loggers created by one backend share the file handle.
pub struct FileBackend {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl FileBackend {
    /// Create the logs directory if needed and open a fresh timestamped file in it
    pub fn create(logs_dir: &Path) -> Result<Self> {
        fs::create_dir_all(logs_dir)?;
        Self::open(create_log_file_path(logs_dir))
    }

    /// Open (or create) an explicit log file for appending
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Full path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LoggingBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn get_logger(&self, name: &str, context: Context) -> Result<LoggerHandle> {
        Ok(Arc::new(FileLogger {
            name: name.to_string(),
            context,
            file: Arc::clone(&self.file),
        }))
    }

    fn config(&self) -> BackendConfig {
        BackendConfig::new().with("path", self.path.display().to_string())
    }
}

/// Logger handed out by [`FileBackend`]
pub struct FileLogger {
    name: String,
    context: Context,
    file: Arc<Mutex<File>>,
}

impl FileLogger {
    fn emit(&self, record: Record) -> Result<()> {
        let line = format_line(Utc::now(), &self.name, &record);
        let mut file = self
            .file
            .lock()
            .map_err(|_| LoggerError::SinkPoisoned("log file".to_string()))?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl Logger for FileLogger {
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

/// Format a record as written to the file, including the trailing newline
///
/// Format: "2026-01-21T14:30:45.123456Z INFO logger: message"
fn format_line(timestamp: DateTime<Utc>, logger: &str, record: &Record) -> String {
    let mut message_lines = record.message.split('\n');
    let mut out = format!(
        "{} {} {}: {}\n",
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        record.level.as_str(),
        logger,
        message_lines.next().unwrap_or_default()
    );
    for line in message_lines {
        out.push_str(MESSAGE_CONTINUATION);
        out.push_str(line);
        out.push('\n');
    }
    if let Some(trace) = &record.trace {
        for line in trace.split('\n') {
            out.push_str(TRACE_CONTINUATION);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Parse a record's first line into a LogEntry
fn parse_log_line(line: &str) -> Option<LogEntry> {
    let (timestamp, rest) = line.split_once(' ')?;
    let (level, rest) = rest.split_once(' ')?;
    let (logger, message) = rest.split_once(": ")?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);

    Some(LogEntry {
        timestamp,
        level: LogLevel::parse(level)?,
        logger: logger.to_string(),
        message: message.to_string(),
        trace: None,
    })
}

/// Read a log file written by [`FileBackend`] back into entries
///
/// Lines that do not parse and are not continuations are skipped.
pub fn read_log_file(path: &Path) -> Result<Vec<LogEntry>> {
    let content = fs::read_to_string(path)?;
    let mut entries: Vec<LogEntry> = Vec::new();

    for line in content.split('\n') {
        if let Some(rest) = line.strip_prefix(TRACE_CONTINUATION) {
            if let Some(entry) = entries.last_mut() {
                let trace = entry.trace.get_or_insert_with(String::new);
                if !trace.is_empty() {
                    trace.push('\n');
                }
                trace.push_str(rest);
            }
        } else if let Some(rest) = line.strip_prefix(MESSAGE_CONTINUATION) {
            if let Some(entry) = entries.last_mut() {
                entry.message.push('\n');
                entry.message.push_str(rest);
            }
        } else if let Some(entry) = parse_log_line(line) {
            entries.push(entry);
        }
    }

    Ok(entries)
}
