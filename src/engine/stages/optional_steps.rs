//! Optional steps stage
//!
//! Orchestrates the post-install commands selected for this run. The
//! engine logs each step and its resolved working directory; the command
//! itself is delegated through the step-runner seam.

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    let steps = ctx.selected_steps();
    let total = steps.len();
    if total == 0 {
        ctx.log().verbose("No optional steps selected");
        return Ok(());
    }

    for (index, step) in steps.iter().enumerate() {
        scope.check_cancelled()?;

        let working_dir = match &step.working_directory {
            Some(dir) => ctx.resolve(None, dir)?,
            None => ctx.root().to_path_buf(),
        };
        ctx.log().info(&format!(
            "Optional step '{}': {} (in {})",
            step.id,
            step.description,
            working_dir.display()
        ));
        runner.run_step(step, &working_dir, ctx.log())?;
        scope.item(index + 1, total, &step.id);
    }

    Ok(())
}
