//! Process termination reasons

use serde::{Deserialize, Serialize};

/// Why a process ended, as reported by [`crate::Logger::end_process`]
///
/// Backends render the symbolic name (`"SUCCESS"`), never a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitCode {
    /// Completed normally
    Success,
    /// Completed, but the work did not succeed
    Failure,
    /// Stopped before completion by request or signal
    Aborted,
    /// Terminated by an unhandled error
    Exception,
    /// Invalid command-line or job arguments
    BadArguments,
    /// Input or output could not be read or written
    IoError,
    /// Ran out of time
    Timeout,
}

impl ExitCode {
    /// All exit codes, in declaration order
    pub const ALL: [ExitCode; 7] = [
        ExitCode::Success,
        ExitCode::Failure,
        ExitCode::Aborted,
        ExitCode::Exception,
        ExitCode::BadArguments,
        ExitCode::IoError,
        ExitCode::Timeout,
    ];

    /// Get the stable symbolic name used when rendering
    pub fn name(&self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::Failure => "FAILURE",
            ExitCode::Aborted => "ABORTED",
            ExitCode::Exception => "EXCEPTION",
            ExitCode::BadArguments => "BAD_ARGUMENTS",
            ExitCode::IoError => "IO_ERROR",
            ExitCode::Timeout => "TIMEOUT",
        }
    }

    /// Numeric status for handing back to the operating system
    pub fn code(&self) -> u8 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Failure => 1,
            ExitCode::Aborted => 2,
            ExitCode::Exception => 3,
            ExitCode::BadArguments => 4,
            ExitCode::IoError => 5,
            ExitCode::Timeout => 6,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}
