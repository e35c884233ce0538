//! Base software stage
//!
//! Places the application the rest of the stack is built around. Cloning
//! is idempotent: an already-populated target is left alone so re-running
//! a failed install is safe.

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    scope.check_cancelled()?;

    let base = &ctx.manifest().base_software;
    let target = ctx.base_software_dir()?;
    ctx.log().info(&format!(
        "Placing base software '{}' at {}",
        base.name,
        target.display()
    ));

    match &base.repository_url {
        Some(url) => {
            if target.join(".git").exists() {
                ctx.log().info(&format!(
                    "Base software already present at {}, skipping clone",
                    target.display()
                ));
            } else {
                runner.clone_repository(url, base.git_ref.as_deref(), &target, ctx.log())?;
            }
        }
        None => {
            // Name-only source: the directory is provisioned, the software
            // itself arrives through an external channel.
            std::fs::create_dir_all(&target)?;
            ctx.log().info(&format!(
                "No repository for '{}'; expecting it at {}",
                base.name,
                target.display()
            ));
        }
    }

    scope.item(1, 1, &base.name);
    Ok(())
}
