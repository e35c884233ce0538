//! The fixed, ordered stage pipeline
//!
//! The manifest's declarative sections map onto one stage each. The order
//! is a contract: base software must exist before dependency resolution,
//! dependencies before model/extension placement (models may anchor on the
//! base-software alias). Stages whose manifest section is empty still run
//! and complete instantly at 100%, keeping the progress math uniform.

mod base_software;
mod dependencies;
mod extensions;
mod models;
mod optional_steps;
mod prepare;

use super::cancel::CancellationToken;
use super::context::InstallContext;
use super::progress::ProgressTracker;
use crate::error::Result;
use crate::runner::StepRunner;

/// One phase of the install pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Prepare,
    BaseSoftware,
    Dependencies,
    Models,
    Extensions,
    OptionalSteps,
}

impl StageKind {
    /// Every stage, in execution order
    pub const ALL: [StageKind; 6] = [
        StageKind::Prepare,
        StageKind::BaseSoftware,
        StageKind::Dependencies,
        StageKind::Models,
        StageKind::Extensions,
        StageKind::OptionalSteps,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Prepare => "Prepare",
            StageKind::BaseSoftware => "Base software",
            StageKind::Dependencies => "Dependencies",
            StageKind::Models => "Models",
            StageKind::Extensions => "Extensions",
            StageKind::OptionalSteps => "Optional steps",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-stage view of progress and cancellation.
///
/// Stages report item completion through the scope; the scope translates
/// it into the overall weighted percent.
pub(crate) struct StageScope<'t, 'a> {
    kind: StageKind,
    index: usize,
    tracker: &'t mut ProgressTracker<'a>,
    cancel: &'t CancellationToken,
}

impl<'t, 'a> StageScope<'t, 'a> {
    pub(crate) fn new(
        kind: StageKind,
        index: usize,
        tracker: &'t mut ProgressTracker<'a>,
        cancel: &'t CancellationToken,
    ) -> Self {
        Self {
            kind,
            index,
            tracker,
            cancel,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.tracker.report(self.index, self.kind, 0.0, self.kind.label());
    }

    /// Checked before every item, never mid-item
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        self.cancel.check()
    }

    /// Report `completed` of `total` homogeneous items done
    pub(crate) fn item(&mut self, completed: usize, total: usize, detail: &str) {
        let local = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        let detail = format!("{} ({completed}/{total}): {detail}", self.kind.label());
        self.tracker.report(self.index, self.kind, local, &detail);
    }

    pub(crate) fn complete(&mut self) {
        let detail = format!("{} complete", self.kind.label());
        self.tracker.report(self.index, self.kind, 100.0, &detail);
    }
}

/// Execute one stage of the pipeline
pub(crate) fn run(
    kind: StageKind,
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    match kind {
        StageKind::Prepare => prepare::run(ctx, runner, scope),
        StageKind::BaseSoftware => base_software::run(ctx, runner, scope),
        StageKind::Dependencies => dependencies::run(ctx, runner, scope),
        StageKind::Models => models::run(ctx, runner, scope),
        StageKind::Extensions => extensions::run(ctx, runner, scope),
        StageKind::OptionalSteps => optional_steps::run(ctx, runner, scope),
    }
}
