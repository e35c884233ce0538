//! Install command implementation
//!
//! Builds an install request from the CLI arguments (optionally via
//! interactive selection), runs the engine on a worker thread, and renders
//! its progress callback as a terminal progress bar.

use std::path::PathBuf;
use std::sync::Arc;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::InstallArgs;
use crate::engine::{
    CancellationToken, InstallRequest, InstallResult, InstallerEngine, ProgressUpdate,
};
use crate::error::{Result, StackforgeError};
use crate::logging::{LogLevel, LogSink};
use crate::manifest::ManifestDescriptor;
use crate::runner::{ProcessRunner, RecordedAction, RecordingRunner, StepRunner};

/// Run install command
pub fn run(manifests_dir: Option<PathBuf>, verbose: bool, args: InstallArgs) -> Result<()> {
    let provider = super::provider(manifests_dir, verbose)?;
    let descriptor = provider.find(&args.id)?;

    let mut request = InstallRequest::new(descriptor.clone(), args.root.clone());

    match (&args.profile, args.interactive) {
        (Some(profile), _) => request = request.with_vram_profile(profile.clone()),
        (None, true) if descriptor.manifest.vram_profiles.len() > 1 => {
            request = request.with_vram_profile(select_profile(&descriptor)?);
        }
        _ => {}
    }

    if !args.steps.is_empty() {
        request = request.with_optional_steps(args.steps.clone());
    } else if args.interactive && !descriptor.manifest.optional_steps.is_empty() {
        request = request.with_optional_steps(select_steps(&descriptor)?);
    }

    if let Some(path) = &args.log_file {
        request = request.with_log_file(path.clone());
    }

    if args.dry_run {
        run_recorded(request, verbose)
    } else {
        run_install(request, verbose, Arc::new(ProcessRunner::new()))
    }
}

/// Execute with the recording runner and print the planned actions
fn run_recorded(request: InstallRequest, verbose: bool) -> Result<()> {
    let runner = Arc::new(RecordingRunner::new());
    run_install(request, verbose, runner.clone())?;

    let actions = runner.actions();
    println!();
    println!(
        "{} ({} actions)",
        Style::new().bold().apply_to("Planned actions"),
        actions.len()
    );
    for action in &actions {
        let line = match action {
            RecordedAction::Clone { url, target, .. } => {
                format!("clone {} -> {}", url, target.display())
            }
            RecordedAction::PipInstall { requirements, .. } => {
                format!("pip install -r {}", requirements.display())
            }
            RecordedAction::FetchModel { name, target, .. } => {
                format!("fetch model '{}' -> {}", name, target.display())
            }
            RecordedAction::RunStep { id, working_dir } => {
                format!("run step '{}' in {}", id, working_dir.display())
            }
        };
        println!("  {}", Style::new().dim().apply_to(line));
    }
    Ok(())
}

fn run_install(request: InstallRequest, verbose: bool, runner: Arc<dyn StepRunner>) -> Result<()> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let log: Arc<dyn LogSink> = Arc::new(BarSink {
        bar: bar.clone(),
        verbose,
    });

    let engine = InstallerEngine::new(runner);
    let cancel = CancellationToken::new();
    let result = {
        let pb = bar.clone();
        let progress = move |update: &ProgressUpdate| {
            pb.set_position(update.percent.round() as u64);
            pb.set_message(update.detail.clone());
        };
        let worker = std::thread::spawn(move || {
            engine.install(&request, Some(&progress), log, &cancel)
        });
        worker.join().map_err(|_| StackforgeError::IoError {
            message: "install worker panicked".to_string(),
        })?
    };
    bar.finish_and_clear();

    match result {
        InstallResult::Succeeded { duration, log_path } => {
            println!(
                "{} in {:.1}s (log: {})",
                Style::new().green().bold().apply_to("Installed"),
                duration.as_secs_f64(),
                log_path.display()
            );
            Ok(())
        }
        InstallResult::Cancelled { duration, log_path } => {
            println!(
                "{} after {:.1}s (log: {})",
                Style::new().yellow().bold().apply_to("Cancelled"),
                duration.as_secs_f64(),
                log_path.display()
            );
            Ok(())
        }
        InstallResult::Failed {
            error, log_path, ..
        } => {
            eprintln!(
                "{} (log: {})",
                Style::new().red().bold().apply_to("Installation failed"),
                log_path.display()
            );
            Err(error)
        }
    }
}

/// Log sink routed through the progress bar so lines do not garble it
struct BarSink {
    bar: ProgressBar,
    verbose: bool,
}

impl LogSink for BarSink {
    fn log(&self, level: LogLevel, text: &str) {
        match level {
            LogLevel::Verbose => {
                if self.verbose {
                    self.bar.println(format!("{}", Style::new().dim().apply_to(text)));
                }
            }
            LogLevel::Info => self.bar.println(text.to_string()),
            LogLevel::Warning => self
                .bar
                .println(format!("{}", Style::new().yellow().apply_to(text))),
            LogLevel::Error => self
                .bar
                .println(format!("{}", Style::new().red().bold().apply_to(text))),
        }
    }
}

fn select_profile(descriptor: &ManifestDescriptor) -> Result<String> {
    let profiles = &descriptor.manifest.vram_profiles;
    let options: Vec<String> = profiles
        .iter()
        .map(|p| format!("{} ({})", p.label, p.id))
        .collect();

    let chosen = inquire::Select::new("VRAM profile:", options.clone()).prompt()?;
    let index = options.iter().position(|o| *o == chosen).unwrap_or(0);
    Ok(profiles[index].id.clone())
}

fn select_steps(descriptor: &ManifestDescriptor) -> Result<Vec<String>> {
    let steps = &descriptor.manifest.optional_steps;
    let options: Vec<String> = steps
        .iter()
        .map(|s| format!("{} - {}", s.id, s.description))
        .collect();
    let defaults: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.enabled_by_default)
        .map(|(i, _)| i)
        .collect();

    let chosen = inquire::MultiSelect::new("Optional steps:", options.clone())
        .with_default(&defaults)
        .prompt()?;

    Ok(chosen
        .iter()
        .filter_map(|choice| options.iter().position(|o| o == choice))
        .map(|index| steps[index].id.clone())
        .collect())
}
