//! Prepare stage: install root and run parameters

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    _runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    let manifest = ctx.manifest();
    ctx.log().info(&format!(
        "Installing '{}' ({}) into {}",
        manifest.title,
        manifest.id,
        ctx.root().display()
    ));

    std::fs::create_dir_all(ctx.root())?;

    match ctx.vram_profile() {
        Some(profile) => ctx.log().info(&format!(
            "Using VRAM profile '{}' ({})",
            profile.label, profile.id
        )),
        None => ctx
            .log()
            .verbose("Manifest lists no VRAM profiles; profile-dependent selection disabled"),
    }

    scope.item(1, 1, &manifest.id);
    Ok(())
}
