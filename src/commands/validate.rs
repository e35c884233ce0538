//! Validate command implementation
//!
//! Loads every manifest and reports the skip diagnostics the provider
//! produced, so a manifest author sees exactly what an install run would.

use std::path::PathBuf;
use std::sync::Arc;

use console::Style;

use crate::error::Result;
use crate::logging::BufferSink;
use crate::manifest::ManifestProvider;

/// Run validate command
pub fn run(manifests_dir: Option<PathBuf>, _verbose: bool) -> Result<()> {
    let directory = super::manifests_dir(manifests_dir);
    let log = Arc::new(BufferSink::new());
    let provider = ManifestProvider::new(&directory, log.clone());

    let descriptors = provider.load()?;
    let skips = log.snapshot();

    println!(
        "{} valid manifest(s) in {}",
        descriptors.len(),
        directory.display()
    );
    for descriptor in &descriptors {
        println!(
            "  {} {}",
            Style::new().green().apply_to("ok"),
            descriptor.id()
        );
    }

    if !skips.is_empty() {
        println!();
        println!("{} skipped:", skips.len());
        for message in &skips {
            println!("  {}", Style::new().yellow().apply_to(&message.text));
        }
    }

    Ok(())
}
