//! Backend that discards every record

use std::sync::Arc;

use crate::backend::LoggingBackend;
use crate::context::Context;
use crate::error::Result;
use crate::exit_code::ExitCode;
use crate::logger::{Exception, Logger, LoggerHandle};
use crate::metric::MetricValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl LoggingBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn get_logger(&self, name: &str, _context: Context) -> Result<LoggerHandle> {
        Ok(Arc::new(NullLogger {
            name: name.to_string(),
        }))
    }
}

#[derive(Debug)]
pub struct NullLogger {
    name: String,
}

impl Logger for NullLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_process(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn end_process(&self, _msg: &str, _exit_code: ExitCode) -> Result<()> {
        Ok(())
    }

    fn report_metric(
        &self,
        _name: &str,
        _metric: MetricValue,
        _subcontext: Option<&Context>,
    ) -> Result<()> {
        Ok(())
    }

    fn report_event(&self, _event: &str, _context: Option<&Context>) -> Result<()> {
        Ok(())
    }

    fn report_exception(&self, _exception: Exception<'_>, _msg: Option<&str>) -> Result<()> {
        Ok(())
    }
}
