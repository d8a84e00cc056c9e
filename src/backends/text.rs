//! Text backend on top of `tracing`
//!
//! The reference backend. Every record becomes one `tracing` event with
//! target `rh_logger` and the logger's name in the `logger` field, so the
//! usual `RUST_LOG` filtering and subscriber formatting apply.

use std::sync::Arc;

use crate::backend::LoggingBackend;
use crate::context::Context;
use crate::error::Result;
use crate::exit_code::ExitCode;
use crate::logger::{Exception, Logger, LoggerHandle};
use crate::metric::MetricValue;
use crate::record::{LogLevel, Record};

/// Backend emitting through the process's `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl TextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LoggingBackend for TextBackend {
    fn name(&self) -> &str {
        "text"
    }

    fn get_logger(&self, name: &str, context: Context) -> Result<LoggerHandle> {
        Ok(Arc::new(TextLogger {
            name: name.to_string(),
            context,
        }))
    }
}

/// Logger handed out by [`TextBackend`]
#[derive(Debug)]
pub struct TextLogger {
    name: String,
    context: Context,
}

impl TextLogger {
    fn emit(&self, record: Record) -> Result<()> {
        let logger = self.name.as_str();
        let kind = record.kind.as_str();
        let message = record.message.as_str();

        match (record.level, record.trace.as_deref()) {
            (LogLevel::Error, Some(trace)) => {
                tracing::error!(target: "rh_logger", logger, kind, trace, "{}", message)
            }
            (LogLevel::Error, None) => {
                tracing::error!(target: "rh_logger", logger, kind, "{}", message)
            }
            (LogLevel::Warn, _) => tracing::warn!(target: "rh_logger", logger, kind, "{}", message),
            (LogLevel::Info, _) => tracing::info!(target: "rh_logger", logger, kind, "{}", message),
            (LogLevel::Debug, _) => {
                tracing::debug!(target: "rh_logger", logger, kind, "{}", message)
            }
            (LogLevel::Trace, _) => {
                tracing::trace!(target: "rh_logger", logger, kind, "{}", message)
            }
        }
        Ok(())
    }
}

impl Logger for TextLogger {
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
