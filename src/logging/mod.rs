//! Log sinks for installation runs
//!
//! Every component that produces output during an installation writes
//! through the [`LogSink`] capability. Three implementations compose:
//! - [`BufferSink`]: thread-safe in-memory buffer with replay and listeners
//! - [`FileSink`]: line-per-message log file, created per run
//! - [`CompositeSink`]: fan-out to an ordered list of sinks, fault-isolated
//!
//! A failing sink never aborts an installation; at worst messages are lost
//! in that one sink.

pub mod buffer;
pub mod composite;
pub mod file;

pub use buffer::{BufferSink, ListenerHandle};
pub use composite::CompositeSink;
pub use file::FileSink;

use chrono::{DateTime, Local};

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Verbose,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Upper-cased label used in the line format
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single immutable log message
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub text: String,
}

impl LogMessage {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            text: text.into(),
        }
    }

    /// Render the message in the line format shared by all sinks:
    /// `[yyyy-MM-dd HH:mm:ss] LEVEL: message`
    ///
    /// The timestamp format is a contract; log files produced by different
    /// sinks for the same run must diff cleanly.
    pub fn format(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.text
        )
    }
}

/// Capability implemented by every log sink
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, text: &str);

    fn verbose(&self, text: &str) {
        self.log(LogLevel::Verbose, text);
    }

    fn info(&self, text: &str) {
        self.log(LogLevel::Info, text);
    }

    fn warn(&self, text: &str) {
        self.log(LogLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.log(LogLevel::Error, text);
    }
}
