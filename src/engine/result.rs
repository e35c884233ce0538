//! Terminal outcome of an installation run

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::StackforgeError;

/// The one value every installation run ends with.
///
/// Created once per run and never mutated; cancellation is a distinct
/// outcome, not a failure.
#[derive(Debug)]
pub enum InstallResult {
    Succeeded {
        duration: Duration,
        log_path: PathBuf,
    },
    Cancelled {
        duration: Duration,
        log_path: PathBuf,
    },
    Failed {
        duration: Duration,
        error: StackforgeError,
        log_path: PathBuf,
    },
}

impl InstallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallResult::Succeeded { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, InstallResult::Cancelled { .. })
    }

    pub fn duration(&self) -> Duration {
        match self {
            InstallResult::Succeeded { duration, .. }
            | InstallResult::Cancelled { duration, .. }
            | InstallResult::Failed { duration, .. } => *duration,
        }
    }

    pub fn log_path(&self) -> &Path {
        match self {
            InstallResult::Succeeded { log_path, .. }
            | InstallResult::Cancelled { log_path, .. }
            | InstallResult::Failed { log_path, .. } => log_path,
        }
    }

    /// The causing error of a failed run, if any
    pub fn error(&self) -> Option<&StackforgeError> {
        match self {
            InstallResult::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
