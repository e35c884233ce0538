//! Recording step runner
//!
//! Records every delegated action instead of performing it. Tests assert
//! on the recorded sequence; `--dry-run` prints it. The runner still logs
//! each action so dry-run output reads like a real run.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::StepRunner;
use crate::error::Result;
use crate::logging::LogSink;
use crate::manifest::{ModelEntry, OptionalStep};

/// One delegated action, as the engine requested it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    Clone {
        url: String,
        git_ref: Option<String>,
        target: PathBuf,
    },
    PipInstall {
        requirements: PathBuf,
        working_dir: PathBuf,
    },
    FetchModel {
        name: String,
        target: PathBuf,
        preference: Vec<String>,
    },
    RunStep {
        id: String,
        working_dir: PathBuf,
    },
}

/// Step runner that records actions without side effects
#[derive(Default)]
pub struct RecordingRunner {
    actions: Mutex<Vec<RecordedAction>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The actions requested so far, in order
    pub fn actions(&self) -> Vec<RecordedAction> {
        self.actions.lock().clone()
    }

    fn record(&self, action: RecordedAction) {
        self.actions.lock().push(action);
    }
}

impl StepRunner for RecordingRunner {
    fn clone_repository(
        &self,
        url: &str,
        git_ref: Option<&str>,
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!("Would clone {} into {}", url, target.display()));
        self.record(RecordedAction::Clone {
            url: url.to_string(),
            git_ref: git_ref.map(str::to_string),
            target: target.to_path_buf(),
        });
        Ok(())
    }

    fn install_requirements(
        &self,
        requirements: &Path,
        _python: Option<&str>,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!(
            "Would install requirements from {}",
            requirements.display()
        ));
        self.record(RecordedAction::PipInstall {
            requirements: requirements.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
        });
        Ok(())
    }

    fn fetch_model(
        &self,
        model: &ModelEntry,
        preference: &[String],
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!(
            "Would fetch model '{}' into {}",
            model.name,
            target.display()
        ));
        self.record(RecordedAction::FetchModel {
            name: model.name.clone(),
            target: target.to_path_buf(),
            preference: preference.to_vec(),
        });
        Ok(())
    }

    fn run_step(
        &self,
        step: &OptionalStep,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!(
            "Would run optional step '{}' in {}",
            step.id,
            working_dir.display()
        ));
        self.record(RecordedAction::RunStep {
            id: step.id.clone(),
            working_dir: working_dir.to_path_buf(),
        });
        Ok(())
    }
}
