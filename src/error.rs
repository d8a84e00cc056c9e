//! Error types for logger construction and event emission

use thiserror::Error;

/// Errors surfaced by backends through the facade
///
/// The facade never wraps, retries or downgrades these; whatever the backend
/// returns reaches the caller as-is.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The backend could not produce a logger for the requested name
    #[error("failed to construct logger '{name}': {reason}")]
    Construction { name: String, reason: String },

    /// The backend's sink failed while writing or flushing
    #[error("log sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the sink lock
    #[error("log sink poisoned: {0}")]
    SinkPoisoned(String),
}

/// Result alias used by [`crate::Logger`] and [`crate::LoggingBackend`]
pub type Result<T> = std::result::Result<T, LoggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_error_display() {
        let err = LoggerError::Construction {
            name: "align".to_string(),
            reason: "no file handle".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to construct logger 'align': no file handle"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: LoggerError = io.into();
        assert!(matches!(err, LoggerError::Io(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
