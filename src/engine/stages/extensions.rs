//! Extensions stage
//!
//! Clones each extension repository into its resolved target, skipping
//! targets that already hold a checkout so re-runs stay idempotent.

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    let extensions = &ctx.manifest().extensions;
    let total = extensions.len();
    if total == 0 {
        ctx.log().verbose("No extensions to install");
        return Ok(());
    }

    for (index, extension) in extensions.iter().enumerate() {
        scope.check_cancelled()?;

        let target = ctx.target(&extension.target)?;
        if target.join(".git").exists() {
            ctx.log().info(&format!(
                "Extension '{}' already present at {}, skipping clone",
                extension.name,
                target.display()
            ));
        } else {
            ctx.log().info(&format!(
                "Installing extension '{}' into {}",
                extension.name,
                target.display()
            ));
            runner.clone_repository(&extension.repository, None, &target, ctx.log())?;
        }
        scope.item(index + 1, total, &extension.name);
    }

    Ok(())
}
