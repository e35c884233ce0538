//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stackforge - manifest-driven installer for AI application stacks
#[derive(Parser, Debug)]
#[command(
    name = "stackforge",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Manifest-driven installer for AI application stacks",
    long_about = "Stackforge installs AI application stacks (base software, Python \
                  dependencies, model assets, extensions, optional post-install steps) \
                  by executing declarative JSON manifests from a watched directory.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  stackforge list\n    \
                  stackforge show comfyui\n    \
                  stackforge install comfyui --root ~/stacks/comfy\n    \
                  stackforge install comfyui --root ~/stacks/comfy --profile 16gb\n    \
                  stackforge validate"
)]
pub struct Cli {
    /// Manifest directory (defaults to the user config directory)
    #[arg(long, short = 'm', global = true, value_name = "DIR")]
    pub manifests_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install an application stack from a manifest
    Install(InstallArgs),

    /// List available manifests
    List(ListArgs),

    /// Show one manifest in detail
    Show(ShowArgs),

    /// Validate every manifest in the directory
    Validate,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install with defaults:\n    stackforge install comfyui --root ~/stacks/comfy\n\n\
                  Select a VRAM profile:\n    stackforge install comfyui --root ~/stacks/comfy --profile 16gb\n\n\
                  Run specific optional steps:\n    stackforge install comfyui --root ~/stacks/comfy --step warmup --step benchmark\n\n\
                  Preview without side effects:\n    stackforge install comfyui --root ~/stacks/comfy --dry-run\n\n\
                  Pick profile and steps interactively:\n    stackforge install comfyui --root ~/stacks/comfy --interactive")]
pub struct InstallArgs {
    /// Manifest id to install
    pub id: String,

    /// Install root directory (created if missing)
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// VRAM profile id (matched case-insensitively; first listed otherwise)
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Optional step ids to run (replaces the manifest defaults)
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<String>,

    /// Explicit log file path (derived under the root otherwise)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Record and print actions without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Select profile and optional steps interactively
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show detailed output
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Manifest id to show
    pub id: String,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
