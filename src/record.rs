//! Rendering of logger calls into text records
//!
//! Every bundled backend renders through these constructors so that the
//! same call produces the same text regardless of where it ends up.

use crate::context::Context;
use crate::exit_code::ExitCode;
use crate::logger::Exception;
use crate::metric::MetricValue;

/// Severity of a rendered record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Check if this level is a warning or error (for alerts)
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }

    /// Parse a level name as written by [`LogLevel::as_str`]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which logger operation produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    StartProcess,
    EndProcess,
    Metric,
    Event,
    Exception,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::StartProcess => "start_process",
            RecordKind::EndProcess => "end_process",
            RecordKind::Metric => "metric",
            RecordKind::Event => "event",
            RecordKind::Exception => "exception",
        }
    }
}

/// A rendered logger call, ready for a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: RecordKind,
    pub level: LogLevel,
    pub message: String,
    /// Cause chain and backtrace, only for in-flight exceptions
    pub trace: Option<String>,
}

impl Record {
    fn info(kind: RecordKind, message: String) -> Self {
        Self {
            kind,
            level: LogLevel::Info,
            message,
            trace: None,
        }
    }

    pub fn start_process(msg: &str, context: &Context) -> Self {
        Self::info(
            RecordKind::StartProcess,
            format!("Starting process: {} ({})", msg, context),
        )
    }

    pub fn end_process(msg: &str, exit_code: ExitCode) -> Self {
        Self::info(
            RecordKind::EndProcess,
            format!("Ending process: {}, exit code = {}", msg, exit_code.name()),
        )
    }

    pub fn metric(name: &str, metric: &MetricValue, subcontext: Option<&Context>) -> Self {
        let message = match subcontext {
            Some(sub) => format!("{}={} ({})", name, metric, sub),
            None => format!("{}={}", name, metric),
        };
        Self::info(RecordKind::Metric, message)
    }

    pub fn event(event: &str, context: Option<&Context>) -> Self {
        let message = match context {
            Some(ctx) => format!("{} ({})", event, ctx),
            None => event.to_string(),
        };
        Self::info(RecordKind::Event, message)
    }

    pub fn exception(exception: &Exception<'_>, msg: Option<&str>) -> Self {
        Self {
            kind: RecordKind::Exception,
            level: LogLevel::Error,
            message: msg
                .map(str::to_string)
                .unwrap_or_else(|| exception.message()),
            trace: exception.trace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_without_subcontext_has_no_suffix() {
        let record = Record::metric("rand_score", &0.94.into(), None);
        assert_eq!(record.message, "rand_score=0.94");
        assert_eq!(record.level, LogLevel::Info);
    }

    #[test]
    fn test_metric_with_subcontext() {
        let sub = Context::from("tile:3");
        let record = Record::metric("tile_time", &1.2.into(), Some(&sub));
        assert_eq!(record.message, "tile_time=1.2 (tile:3)");
    }

    #[test]
    fn test_event_rendering() {
        assert_eq!(Record::event("Frobbing complete", None).message, "Frobbing complete");
        let ctx = Context::new(json!({"mfov": 5}));
        assert_eq!(
            Record::event("Frobbing complete", Some(&ctx)).message,
            r#"Frobbing complete ({"mfov":5})"#
        );
    }

    #[test]
    fn test_process_rendering() {
        let ctx = Context::new(json!(["--input", "stack.h5"]));
        assert_eq!(
            Record::start_process("align", &ctx).message,
            r#"Starting process: align (["--input","stack.h5"])"#
        );
        assert_eq!(
            Record::end_process("done", ExitCode::Success).message,
            "Ending process: done, exit code = SUCCESS"
        );
    }

    #[test]
    fn test_log_level_is_alert() {
        assert!(!LogLevel::Trace.is_alert());
        assert!(!LogLevel::Debug.is_alert());
        assert!(!LogLevel::Info.is_alert());
        assert!(LogLevel::Warn.is_alert());
        assert!(LogLevel::Error.is_alert());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("warn"), None);
    }
}
