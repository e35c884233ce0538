//! Models stage
//!
//! Places each model asset under its resolved target. The selected VRAM
//! profile's GGUF preference ordering travels with every fetch so the
//! runner can pick among candidate files; without a profile the preference
//! list is empty and fetches are unfiltered.

use super::{InstallContext, StageScope};
use crate::error::Result;
use crate::runner::StepRunner;

pub(super) fn run(
    ctx: &InstallContext<'_>,
    runner: &dyn StepRunner,
    scope: &mut StageScope<'_, '_>,
) -> Result<()> {
    let models = &ctx.manifest().models;
    let total = models.len();
    if total == 0 {
        ctx.log().verbose("No models to place");
        return Ok(());
    }

    let preference: Vec<String> = ctx
        .vram_profile()
        .map(|profile| profile.gguf_preference.clone())
        .unwrap_or_default();

    for (index, model) in models.iter().enumerate() {
        scope.check_cancelled()?;

        let target = ctx.target(&model.target)?;
        std::fs::create_dir_all(&target)?;
        ctx.log().info(&format!(
            "Fetching model '{}' into {}",
            model.name,
            target.display()
        ));
        runner.fetch_model(model, &preference, &target, ctx.log())?;
        scope.item(index + 1, total, &model.name);
    }

    Ok(())
}
