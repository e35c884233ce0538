//! Installer engine
//!
//! Executes one installation run: builds the fixed stage list from the
//! request's manifest snapshot, runs the stages in order with cooperative
//! cancellation, aggregates weighted progress, and produces a terminal
//! [`InstallResult`]. Installation is not transactional: partial work is
//! never rolled back, and stages are written so re-running is safe.

mod cancel;
mod context;
mod progress;
mod request;
mod result;
pub mod stages;

pub use cancel::CancellationToken;
pub use context::InstallContext;
pub use progress::{ProgressSink, ProgressUpdate};
pub use request::InstallRequest;
pub use result::InstallResult;
pub use stages::StageKind;

use std::sync::Arc;
use std::time::Instant;

use chrono::Local;

use self::progress::ProgressTracker;
use self::stages::StageScope;
use crate::error::{Result, StackforgeError};
use crate::logging::{CompositeSink, FileSink, LogSink};
use crate::runner::StepRunner;

/// The engine executing installation runs
pub struct InstallerEngine {
    runner: Arc<dyn StepRunner>,
}

impl InstallerEngine {
    pub fn new(runner: Arc<dyn StepRunner>) -> Self {
        Self { runner }
    }

    /// Execute one installation run to its terminal result.
    ///
    /// The run logs to `log` and, when the log file can be created, to a
    /// per-run file under the install root; a failed file-sink creation
    /// degrades to the provided sink alone. The caller always receives an
    /// [`InstallResult`], never a bare error.
    pub fn install(
        &self,
        request: &InstallRequest,
        progress: Option<&dyn ProgressSink>,
        log: Arc<dyn LogSink>,
        cancel: &CancellationToken,
    ) -> InstallResult {
        let started_at = Local::now();
        let timer = Instant::now();
        let log_path = request.resolve_log_path(started_at);

        // The root must exist before a log file can be opened under it.
        if let Err(err) = std::fs::create_dir_all(request.install_root()) {
            let error = StackforgeError::from(err);
            log.error(&format!(
                "Failed to create install root {}: {}",
                request.install_root().display(),
                error
            ));
            return InstallResult::Failed {
                duration: timer.elapsed(),
                error,
                log_path,
            };
        }

        let sink: Arc<dyn LogSink> = match FileSink::create(&log_path) {
            Ok(file) => Arc::new(CompositeSink::new(vec![log, Arc::new(file)])),
            Err(err) => {
                log.warn(&format!("{err}; continuing with in-memory logging only"));
                log
            }
        };

        let outcome = self.run_pipeline(request, progress, sink.clone(), cancel);
        let duration = timer.elapsed();

        match outcome {
            Ok(()) => {
                sink.info(&format!(
                    "Installation of '{}' completed in {:.1}s",
                    request.manifest().title(),
                    duration.as_secs_f64()
                ));
                InstallResult::Succeeded { duration, log_path }
            }
            Err(StackforgeError::Cancelled) => {
                sink.warn("Installation cancelled");
                InstallResult::Cancelled { duration, log_path }
            }
            Err(error) => {
                sink.verbose(&format!("{error:?}"));
                sink.error(&format!("Installation failed: {error}"));
                InstallResult::Failed {
                    duration,
                    error,
                    log_path,
                }
            }
        }
    }

    fn run_pipeline(
        &self,
        request: &InstallRequest,
        progress: Option<&dyn ProgressSink>,
        log: Arc<dyn LogSink>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let ctx = InstallContext::new(request, log)?;
        let mut tracker = ProgressTracker::new(progress, StageKind::ALL.len());

        for (index, kind) in StageKind::ALL.into_iter().enumerate() {
            cancel.check()?;
            let mut scope = StageScope::new(kind, index, &mut tracker, cancel);
            scope.begin();
            stages::run(kind, &ctx, self.runner.as_ref(), &mut scope)?;
            scope.complete();
        }

        Ok(())
    }
}
