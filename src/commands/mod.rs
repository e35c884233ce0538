//! Command implementations for the CLI

pub mod completions;
pub mod install;
pub mod list;
pub mod show;
pub mod validate;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::logging::{LogLevel, LogSink};
use crate::manifest::ManifestProvider;

/// Resolve the manifest directory: the CLI flag, else
/// `<config dir>/stackforge/manifests`
pub fn manifests_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir.unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stackforge/manifests")
    })
}

/// Build a provider whose skip diagnostics echo to the terminal
pub fn provider(cli_dir: Option<PathBuf>, verbose: bool) -> Result<ManifestProvider> {
    let directory = manifests_dir(cli_dir);
    Ok(ManifestProvider::new(
        directory,
        Arc::new(ConsoleSink { verbose }),
    ))
}

/// Log sink echoing messages to the terminal with console styling.
///
/// Verbose messages are suppressed unless `--verbose` was passed; warnings
/// and errors are styled so they stand out among progress output.
pub struct ConsoleSink {
    pub verbose: bool,
}

impl LogSink for ConsoleSink {
    fn log(&self, level: LogLevel, text: &str) {
        use console::Style;
        match level {
            LogLevel::Verbose => {
                if self.verbose {
                    eprintln!("{}", Style::new().dim().apply_to(text));
                }
            }
            LogLevel::Info => eprintln!("{text}"),
            LogLevel::Warning => {
                eprintln!("{}", Style::new().yellow().apply_to(text));
            }
            LogLevel::Error => {
                eprintln!("{}", Style::new().red().bold().apply_to(text));
            }
        }
    }
}
