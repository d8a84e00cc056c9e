//! Bundled backends
//!
//! - `text`: the reference backend, emitting through `tracing`
//! - `memory`: ring buffer for in-process inspection
//! - `file`: timestamped append-only log files, with retention cleanup
//! - `null`: discards everything

pub mod file;
pub mod memory;
pub mod null;
pub mod retention;
pub mod text;

pub use file::{read_log_file, FileBackend, FileLogger};
pub use memory::{LogBuffer, LogEntry, MemoryBackend, MemoryLogger};
pub use null::{NullBackend, NullLogger};
pub use retention::{cleanup_old_logs, cleanup_old_logs_with_retention};
pub use text::{TextBackend, TextLogger};
