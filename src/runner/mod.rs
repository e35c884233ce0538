//! Step runner seam
//!
//! The engine orchestrates an installation but never performs the heavy
//! operations itself; clones, pip installs, asset transfers, and optional
//! post-install commands all flow through the [`StepRunner`] trait. The
//! crate ships two implementations:
//! - [`ProcessRunner`]: the real thing — git2-backed clones, subprocesses
//!   for pip/shell, delegated asset transfer
//! - [`RecordingRunner`]: records requested actions without side effects;
//!   used by tests and by `--dry-run`

pub mod git;
pub mod process;
pub mod recording;
pub mod selection;

pub use process::ProcessRunner;
pub use recording::{RecordedAction, RecordingRunner};

use std::path::Path;

use crate::error::Result;
use crate::logging::LogSink;
use crate::manifest::{ModelEntry, OptionalStep};

/// The operations an installation run delegates to a collaborator
pub trait StepRunner: Send + Sync {
    /// Clone `url` into `target`, optionally checking out `git_ref`
    fn clone_repository(
        &self,
        url: &str,
        git_ref: Option<&str>,
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()>;

    /// Install a pip requirements file, running inside `working_dir`
    fn install_requirements(
        &self,
        requirements: &Path,
        python: Option<&str>,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()>;

    /// Place a model asset under `target`, honoring the run's GGUF
    /// preference ordering when choosing among candidate files
    fn fetch_model(
        &self,
        model: &ModelEntry,
        preference: &[String],
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()>;

    /// Execute one optional post-install step inside `working_dir`
    fn run_step(
        &self,
        step: &OptionalStep,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()>;
}
