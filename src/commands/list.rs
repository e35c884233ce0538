//! List command implementation
//!
//! Lists the valid manifests in the watched directory with their base
//! software and asset counts.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::manifest::ManifestDescriptor;

/// Run list command
pub fn run(manifests_dir: Option<PathBuf>, verbose: bool, args: ListArgs) -> Result<()> {
    let provider = super::provider(manifests_dir, verbose)?;
    let descriptors = provider.load()?;

    if descriptors.is_empty() {
        println!("No manifests found in {}.", provider.directory().display());
        return Ok(());
    }

    println!("Available manifests ({}):", descriptors.len());
    println!();

    for descriptor in &descriptors {
        if args.detailed {
            display_detailed(descriptor);
        } else {
            display_simple(descriptor);
        }
        println!();
    }

    Ok(())
}

fn display_simple(descriptor: &ManifestDescriptor) {
    let manifest = &descriptor.manifest;
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&manifest.id),
        Style::new().dim().apply_to(&manifest.title)
    );
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Base software:"),
        manifest.base_software.name
    );
    if let Some(counts) = format_counts(descriptor) {
        println!("    {} {}", Style::new().bold().apply_to("Contents:"), counts);
    }
}

fn display_detailed(descriptor: &ManifestDescriptor) {
    let manifest = &descriptor.manifest;
    display_simple(descriptor);
    println!(
        "    {} {}",
        Style::new().bold().apply_to("File:"),
        descriptor.path.display()
    );

    if !manifest.vram_profiles.is_empty() {
        println!("    {}", Style::new().bold().apply_to("VRAM profiles:"));
        for profile in &manifest.vram_profiles {
            println!(
                "      {} {}",
                Style::new().cyan().apply_to(&profile.id),
                Style::new().dim().apply_to(&profile.label)
            );
        }
    }

    if !manifest.models.is_empty() {
        println!("    {}", Style::new().bold().apply_to("Models:"));
        for model in &manifest.models {
            println!(
                "      {} -> {}",
                Style::new().cyan().apply_to(&model.name),
                Style::new().dim().apply_to(&model.target)
            );
        }
    }
}

fn format_counts(descriptor: &ManifestDescriptor) -> Option<String> {
    let manifest = &descriptor.manifest;
    let parts = [
        ("model", manifest.models.len()),
        ("extension", manifest.extensions.len()),
        ("optional step", manifest.optional_steps.len()),
        ("VRAM profile", manifest.vram_profiles.len()),
    ];

    let non_zero: Vec<String> = parts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| match *count {
            1 => format!("1 {name}"),
            _ => format!("{count} {name}s"),
        })
        .collect();

    if non_zero.is_empty() {
        None
    } else {
        Some(non_zero.join(", "))
    }
}
