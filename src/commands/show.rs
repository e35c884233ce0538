//! Show command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::manifest::InstallManifest;

/// Run show command
pub fn run(manifests_dir: Option<PathBuf>, verbose: bool, args: ShowArgs) -> Result<()> {
    let provider = super::provider(manifests_dir, verbose)?;
    let descriptor = provider.find(&args.id)?;
    let manifest = &descriptor.manifest;

    println!("  {}", Style::new().bold().yellow().apply_to(&manifest.title));
    println!("    {} {}", Style::new().bold().apply_to("Id:"), manifest.id);
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Schema:"),
        manifest.schema_version
    );
    println!(
        "    {} {}",
        Style::new().bold().apply_to("File:"),
        descriptor.path.display()
    );

    display_base_software(manifest);
    display_dependencies(manifest);
    display_profiles(manifest);
    display_models(manifest);
    display_extensions(manifest);
    display_steps(manifest);

    Ok(())
}

fn display_base_software(manifest: &InstallManifest) {
    let base = &manifest.base_software;
    println!("    {}", Style::new().bold().apply_to("Base software:"));
    println!("      {} {}", Style::new().bold().apply_to("name:"), base.name);
    if let Some(url) = &base.repository_url {
        println!("      {} {}", Style::new().bold().apply_to("repository:"), url);
    }
    if let Some(git_ref) = &base.git_ref {
        println!("      {} {}", Style::new().bold().apply_to("ref:"), git_ref);
    }
    println!(
        "      {} {}",
        Style::new().bold().apply_to("target:"),
        base.target
    );
}

fn display_dependencies(manifest: &InstallManifest) {
    let deps = &manifest.dependencies;
    if deps.python.is_none() && deps.cuda.is_none() && deps.pip_requirements.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to("Dependencies:"));
    if let Some(python) = &deps.python {
        println!("      {} {}", Style::new().bold().apply_to("python:"), python);
    }
    if let Some(cuda) = &deps.cuda {
        println!("      {} {}", Style::new().bold().apply_to("cuda:"), cuda);
    }
    for requirement in &deps.pip_requirements {
        let anchor = requirement.relative_to.as_deref().unwrap_or("<installRoot>");
        println!(
            "      - {} ({})",
            requirement.path,
            Style::new().dim().apply_to(anchor)
        );
    }
}

fn display_profiles(manifest: &InstallManifest) {
    if manifest.vram_profiles.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to("VRAM profiles:"));
    for profile in &manifest.vram_profiles {
        let mut line = format!("{} - {}", profile.id, profile.label);
        if !profile.gguf_preference.is_empty() {
            line.push_str(&format!(" [{}]", profile.gguf_preference.join(" > ")));
        }
        if let Some(resolution) = profile.mixed_basic_resolution {
            line.push_str(&format!(" @{resolution}"));
        }
        println!("      {}", Style::new().cyan().apply_to(line));
    }
}

fn display_models(manifest: &InstallManifest) {
    if manifest.models.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to("Models:"));
    for model in &manifest.models {
        println!(
            "      {} ({}) -> {}",
            Style::new().cyan().apply_to(&model.name),
            model.source,
            Style::new().dim().apply_to(&model.target)
        );
    }
}

fn display_extensions(manifest: &InstallManifest) {
    if manifest.extensions.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to("Extensions:"));
    for extension in &manifest.extensions {
        println!(
            "      {} -> {}",
            Style::new().cyan().apply_to(&extension.name),
            Style::new().dim().apply_to(&extension.target)
        );
    }
}

fn display_steps(manifest: &InstallManifest) {
    if manifest.optional_steps.is_empty() {
        return;
    }
    println!("    {}", Style::new().bold().apply_to("Optional steps:"));
    for step in &manifest.optional_steps {
        let marker = if step.enabled_by_default {
            "[default]"
        } else {
            "[opt-in]"
        };
        println!(
            "      {} {} {}",
            Style::new().cyan().apply_to(&step.id),
            step.description,
            Style::new().dim().apply_to(marker)
        );
    }
}
