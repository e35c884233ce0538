//! Dependencies stage
//!
//! Runs each pip requirement list through the step runner, anchored on the
//! alias table so lists can be relative to the base-software directory.

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    let deps = &ctx.manifest().dependencies;

    if let Some(python) = &deps.python {
        ctx.log().verbose(&format!("Python version hint: {python}"));
    }
    if let Some(cuda) = &deps.cuda {
        ctx.log().verbose(&format!("CUDA version hint: {cuda}"));
    }

    let total = deps.pip_requirements.len();
    if total == 0 {
        ctx.log().verbose("No pip requirement lists");
        return Ok(());
    }

    let working_dir = ctx.base_software_dir()?;
    for (index, requirement) in deps.pip_requirements.iter().enumerate() {
        scope.check_cancelled()?;

        let resolved = ctx.resolve(requirement.relative_to.as_deref(), &requirement.path)?;
        ctx.log().info(&format!(
            "Installing pip requirements from {}",
            resolved.display()
        ));
        runner.install_requirements(&resolved, deps.python.as_deref(), &working_dir, ctx.log())?;
        scope.item(index + 1, total, &requirement.path);
    }

    Ok(())
}
