//! Logger trait and associated types
//!
//! This module defines the capability every backend hands out. A logger is
//! bound to a name and a [`Context`] when it is created and keeps using the
//! backend that created it for its whole life.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Result;
use crate::exit_code::ExitCode;
use crate::metric::MetricValue;

/// Shared handle to a logger
pub type LoggerHandle = Arc<dyn Logger>;

/// An error passed to [`Logger::report_exception`]
#[derive(Debug, Clone, Copy)]
pub enum Exception<'a> {
    /// An error object the caller holds; rendered without a trace
    Error(&'a (dyn std::error::Error + 'static)),
    /// The failure currently propagating out of the caller's operation;
    /// rendered with its cause chain and backtrace
    InFlight(&'a anyhow::Error),
}

impl<'a> Exception<'a> {
    /// Wrap any concrete error type
    pub fn error<E: std::error::Error + 'static>(error: &'a E) -> Self {
        Exception::Error(error)
    }

    /// Default message, the error's `Display` form
    pub fn message(&self) -> String {
        match self {
            Exception::Error(e) => e.to_string(),
            Exception::InFlight(e) => e.to_string(),
        }
    }

    /// Diagnostic trace, present only for in-flight errors
    pub fn trace(&self) -> Option<String> {
        match self {
            Exception::Error(_) => None,
            Exception::InFlight(e) => Some(in_flight_trace(e)),
        }
    }
}

/// Cause chain followed by a backtrace
///
/// Uses the backtrace captured with the error when there is one, otherwise
/// captures one at the report site regardless of RUST_BACKTRACE.
fn in_flight_trace(error: &anyhow::Error) -> String {
    let mut trace = String::from("Error chain:\n");
    for (depth, cause) in error.chain().enumerate() {
        let _ = writeln!(trace, "    {}: {}", depth, cause);
    }

    let captured = error.backtrace();
    if captured.status() == BacktraceStatus::Captured {
        let _ = write!(trace, "Stack backtrace:\n{}", captured);
    } else {
        let _ = write!(
            trace,
            "Stack backtrace (report site):\n{}",
            Backtrace::force_capture()
        );
    }
    trace
}

impl<'a> From<&'a anyhow::Error> for Exception<'a> {
    fn from(error: &'a anyhow::Error) -> Self {
        Exception::InFlight(error)
    }
}

/// Trait for structured loggers
///
/// Each call returns once the backend has accepted the event. Backends may
/// flush later but must not drop an accepted event silently, and any sink
/// failure comes back as an error.
///
/// # Object Safety
/// This trait is object-safe to allow `Arc<dyn Logger>` usage.
pub trait Logger: Send + Sync {
    /// Name the logger was created with
    fn name(&self) -> &str;

    /// Report the start of a process, together with the bound context
    fn start_process(&self, msg: &str) -> Result<()>;

    /// Report the end of a process
    fn end_process(&self, msg: &str, exit_code: ExitCode) -> Result<()>;

    /// Report a metric such as accuracy or execution time
    ///
    /// `subcontext` identifies a sub-unit of work (a tile, a batch). When it
    /// is `None` nothing is rendered in its place.
    fn report_metric(
        &self,
        name: &str,
        metric: MetricValue,
        subcontext: Option<&Context>,
    ) -> Result<()>;

    /// Report a generic event
    fn report_event(&self, event: &str, context: Option<&Context>) -> Result<()>;

    /// Report an error at elevated severity
    ///
    /// `msg` overrides the message; by default the error's `Display` form is
    /// used.
    fn report_exception(&self, exception: Exception<'_>, msg: Option<&str>) -> Result<()>;
}

/// Run `f`, reporting its error through `logger` before returning it
///
/// The error is reported as [`Exception::InFlight`] so the trace is attached.
/// The caller always gets `f`'s own error back; a failure to report it is
/// logged through `tracing` instead.
pub fn report_failures<T, F>(logger: &dyn Logger, f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    match f() {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Err(report_err) = logger.report_exception(Exception::InFlight(&err), None) {
                tracing::warn!(
                    logger = logger.name(),
                    "Failed to report error '{}': {}",
                    err,
                    report_err
                );
            }
            Err(err)
        }
    }
}
