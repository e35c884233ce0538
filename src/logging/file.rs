//! File-backed log sink
//!
//! One formatted line per message, written immediately. The file is created
//! (truncating any previous content) when the sink is constructed, so a
//! failed construction can be handled by degrading to buffer-only logging.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{LogLevel, LogMessage, LogSink};
use crate::error::{Result, StackforgeError};

/// Log sink appending one line per message to a file
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StackforgeError::LogFileFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let file = File::create(path).map_err(|e| StackforgeError::LogFileFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn log(&self, level: LogLevel, text: &str) {
        let line = LogMessage::new(level, text).format();
        let mut file = self.file.lock();
        // Write failures are swallowed: logging must never abort a run.
        let _ = writeln!(file, "{line}");
    }
}
