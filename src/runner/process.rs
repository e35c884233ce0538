//! Process-backed step runner
//!
//! The production collaborator: clones through git2, runs pip and optional
//! steps as subprocesses, and delegates plain-URL asset transfer to the
//! system downloader. Retries, proxies, and credentials are the underlying
//! tools' concern, not this runner's.

use std::path::Path;
use std::process::Command;

use super::{StepRunner, git, selection};
use crate::error::{Result, StackforgeError};
use crate::logging::LogSink;
use crate::manifest::{ModelEntry, OptionalStep};

/// Step runner that performs the real operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl StepRunner for ProcessRunner {
    fn clone_repository(
        &self,
        url: &str,
        git_ref: Option<&str>,
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!("Cloning {} into {}", url, target.display()));

        // A pinned ref needs the full history to resolve tags and SHAs.
        let shallow = git_ref.is_none();
        let repo = git::clone(url, target, shallow)?;

        if let Some(reference) = git_ref {
            let sha = git::resolve_ref(&repo, reference)?;
            git::checkout_commit(&repo, &sha)?;
            log.verbose(&format!("Checked out '{reference}' at {sha}"));
        }
        Ok(())
    }

    fn install_requirements(
        &self,
        requirements: &Path,
        python: Option<&str>,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        if let Some(version) = python {
            log.verbose(&format!("Manifest prefers Python {version}"));
        }

        let mut command = Command::new(python_command());
        command
            .args(["-m", "pip", "install", "-r"])
            .arg(requirements)
            .current_dir(working_dir);
        log.verbose(&format!(
            "Running pip install -r {} in {}",
            requirements.display(),
            working_dir.display()
        ));
        run_command(command, "pip install")
    }

    fn fetch_model(
        &self,
        model: &ModelEntry,
        preference: &[String],
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        if let Some(repository) = &model.repository {
            if target.join(".git").exists() {
                log.info(&format!(
                    "Model '{}' already present at {}, skipping fetch",
                    model.name,
                    target.display()
                ));
                return Ok(());
            }

            git::clone(repository, target, true)?;

            let candidates = collect_file_names(target);
            match selection::pick_preferred(
                &candidates,
                preference,
                model.match_pattern.as_deref(),
            )? {
                Some(preferred) => {
                    log.info(&format!("Preferred variant for '{}': {preferred}", model.name));
                }
                None => log.verbose(&format!(
                    "No file in '{}' matches the preference ordering",
                    model.name
                )),
            }
            return Ok(());
        }

        if let Some(url) = &model.url {
            let file_name = url_file_name(url).unwrap_or_else(|| model.name.clone());
            let destination = target.join(file_name);
            if destination.exists() {
                log.info(&format!(
                    "Model '{}' already present at {}, skipping download",
                    model.name,
                    destination.display()
                ));
                return Ok(());
            }

            log.verbose(&format!("Downloading {url} to {}", destination.display()));
            let mut command = Command::new("curl");
            command
                .args(["-L", "--fail", "--silent", "--show-error", "-o"])
                .arg(&destination)
                .arg(url);
            return run_command(command, "download").map_err(|err| {
                StackforgeError::DownloadFailed {
                    url: url.clone(),
                    reason: err.to_string(),
                }
            });
        }

        Err(StackforgeError::StepFailed {
            step: format!("model '{}'", model.name),
            reason: "no repository or url given".to_string(),
        })
    }

    fn run_step(
        &self,
        step: &OptionalStep,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        log.verbose(&format!("Running shell command: {}", step.shell));

        let mut command = shell_command(&step.shell);
        command.current_dir(working_dir);
        run_command(command, &step.id)
    }
}

fn python_command() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", line]);
        command
    } else {
        let mut command = Command::new("sh");
        command.args(["-c", line]);
        command
    }
}

/// Run a command to completion, mapping failures to `StepFailed` with the
/// tail of stderr for context
fn run_command(mut command: Command, step: &str) -> Result<()> {
    let output = command.output().map_err(|e| StackforgeError::StepFailed {
        step: step.to_string(),
        reason: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
    let tail: Vec<&str> = tail.into_iter().rev().collect();
    Err(StackforgeError::StepFailed {
        step: step.to_string(),
        reason: format!("exit status {}: {}", output.status, tail.join(" | ")),
    })
}

/// File names under `dir` (relative, forward slashes), `.git` excluded
fn collect_file_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.file_name().is_some_and(|n| n == ".git") {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else if let Ok(relative) = path.strip_prefix(dir) {
                names.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    names.sort();
    names
}

fn url_file_name(url: &str) -> Option<String> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let name = trimmed.rsplit('/').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_url_file_name() {
        assert_eq!(
            url_file_name("https://host/path/model.safetensors?download=true"),
            Some("model.safetensors".to_string())
        );
        assert_eq!(
            url_file_name("https://host/weights.gguf"),
            Some("weights.gguf".to_string())
        );
        assert_eq!(url_file_name("https://host/path/"), None);
    }

    #[test]
    fn test_collect_file_names_skips_git_dir() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(temp.path().join(".git")).expect("mkdir");
        std::fs::create_dir_all(temp.path().join("sub")).expect("mkdir");
        std::fs::write(temp.path().join(".git/HEAD"), "ref").expect("write");
        std::fs::write(temp.path().join("a.gguf"), "x").expect("write");
        std::fs::write(temp.path().join("sub/b.gguf"), "x").expect("write");

        let names = collect_file_names(temp.path());
        assert_eq!(names, vec!["a.gguf".to_string(), "sub/b.gguf".to_string()]);
    }

    #[test]
    fn test_run_command_reports_failure() {
        let mut command = shell_command("exit 3");
        command.current_dir(std::env::temp_dir());
        let result = run_command(command, "probe");
        let err = result.expect_err("should fail");
        assert!(err.to_string().contains("probe"));
    }

    #[test]
    fn test_run_command_success() {
        let mut command = shell_command("true");
        command.current_dir(std::env::temp_dir());
        run_command(command, "probe").expect("success");
    }
}
