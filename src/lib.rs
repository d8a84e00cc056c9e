//! rh-logger - backend-agnostic structured logging facade
//!
//! Application code reports process lifecycle, metrics, events and errors
//! through the [`Logger`] trait. Where those reports end up is decided by the
//! active [`LoggingBackend`], chosen at startup through a [`LoggingRegistry`]
//! or the process-wide functions re-exported here.
//!
//! ```no_run
//! use rh_logger::{get_logger, ExitCode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let logger = get_logger("align", serde_json::json!({"stack": "w01"}))?;
//! logger.start_process("aligning sections")?;
//! logger.report_metric("rand_score", 0.94.into(), None)?;
//! logger.end_process("done", ExitCode::Success)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backends;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_code;
pub mod logger;
pub mod metric;
pub mod record;
pub mod registry;
pub mod subscriber;

pub use backend::{BackendConfig, BackendKind, LoggingBackend};
pub use config::LoggingSettings;
pub use context::Context;
pub use error::LoggerError;
pub use exit_code::ExitCode;
pub use logger::{report_failures, Exception, Logger, LoggerHandle};
pub use metric::{MetricValue, Sample, TimeSeries};
pub use registry::{
    get_logger, get_logging_backend, get_logging_config, logger, set_logging_backend,
    LoggingRegistry,
};
pub use subscriber::init_subscriber;
