//! Manifest parsing, normalization, and boundary validation
//!
//! Raw serde forms mirror the JSON schema with every field optional, so a
//! parse either succeeds completely or fails with a position; structural
//! requirements are then checked in one place, [`parse_manifest`], and
//! reported as [`StackforgeError::ManifestInvalid`]. Optional collections
//! are normalized to empty so downstream code never null-checks.
//!
//! Two schema variants exist in the wild: the strict one keyed by
//! `repositoryUrl`, and a looser one keyed by `repo`. The strict variant is
//! authoritative; the loose one is accepted through serde field aliases and
//! normalized away at this boundary.

use std::path::Path;

use serde::Deserialize;

use super::{
    BaseSoftware, Dependencies, ExtensionEntry, InstallManifest, ModelEntry, OptionalStep,
    PipRequirement, VramProfile,
};
use crate::error::{Result, StackforgeError};
use crate::paths::is_confined_relative;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    schema_version: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    base_software: Option<RawBaseSoftware>,
    #[serde(default)]
    dependencies: Option<RawDependencies>,
    #[serde(default)]
    vram_profiles: Vec<RawVramProfile>,
    #[serde(default)]
    models: Vec<RawModelEntry>,
    #[serde(default)]
    extensions: Vec<RawExtensionEntry>,
    #[serde(default)]
    optional_steps: Vec<RawOptionalStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBaseSoftware {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "repo")]
    repository_url: Option<String>,
    #[serde(default, rename = "ref")]
    git_ref: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependencies {
    #[serde(default)]
    python: Option<String>,
    #[serde(default)]
    cuda: Option<String>,
    #[serde(default)]
    pip_requirements: Vec<RawPipRequirement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPipRequirement {
    #[serde(default)]
    relative_to: Option<String>,
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVramProfile {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    gguf_preference: Vec<String>,
    #[serde(default)]
    mixed_basic_resolution: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModelEntry {
    name: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default, alias = "repo")]
    repository: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "match")]
    match_pattern: Option<String>,
    #[serde(default)]
    prefer_expression: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtensionEntry {
    name: String,
    #[serde(alias = "repo")]
    repository: String,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOptionalStep {
    id: String,
    #[serde(default)]
    description: Option<String>,
    shell: String,
    #[serde(default)]
    working_directory: Option<String>,
    #[serde(default)]
    enabled_by_default: bool,
}

/// Parse and validate one manifest file's content.
///
/// `path` supplies the filename stem used as the default `id` and the
/// location reported in diagnostics.
pub fn parse_manifest(json: &str, path: &Path) -> Result<InstallManifest> {
    let raw: RawManifest =
        serde_json::from_str(json).map_err(|e| StackforgeError::ManifestParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    normalize_and_validate(raw, path)
}

fn invalid(path: &Path, reason: impl Into<String>) -> StackforgeError {
    StackforgeError::ManifestInvalid {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn require_target(path: &Path, owner: &str, target: Option<String>) -> Result<String> {
    let target = target.unwrap_or_default();
    if target.is_empty() {
        return Err(invalid(path, format!("{owner} has no target")));
    }
    if !is_confined_relative(&target) {
        return Err(invalid(
            path,
            format!("{owner} target '{target}' is not a relative path inside the install root"),
        ));
    }
    Ok(target)
}

fn normalize_and_validate(raw: RawManifest, path: &Path) -> Result<InstallManifest> {
    let schema_version = raw.schema_version.unwrap_or_default();
    if schema_version.is_empty() {
        return Err(invalid(path, "missing schemaVersion"));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let id = raw.id.filter(|id| !id.is_empty()).unwrap_or(stem);
    if id.is_empty() {
        return Err(invalid(path, "manifest id is empty"));
    }
    let title = raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| id.clone());

    let base = raw
        .base_software
        .ok_or_else(|| invalid(path, "missing baseSoftware"))?;
    let base_name = base.name.unwrap_or_default();
    let repository_url = base.repository_url.filter(|url| !url.is_empty());
    if base_name.is_empty() && repository_url.is_none() {
        return Err(invalid(
            path,
            "baseSoftware needs a repositoryUrl or a name",
        ));
    }
    let base_software = BaseSoftware {
        target: require_target(path, "baseSoftware", base.target)?,
        name: base_name,
        repository_url,
        git_ref: base.git_ref,
    };

    let dependencies = raw.dependencies.unwrap_or_default();
    let dependencies = Dependencies {
        python: dependencies.python,
        cuda: dependencies.cuda,
        pip_requirements: dependencies
            .pip_requirements
            .into_iter()
            .map(|req| PipRequirement {
                relative_to: req.relative_to,
                path: req.path,
            })
            .collect(),
    };

    let vram_profiles = raw
        .vram_profiles
        .into_iter()
        .map(|profile| VramProfile {
            label: profile.label.unwrap_or_else(|| profile.id.clone()),
            id: profile.id,
            gguf_preference: profile.gguf_preference,
            mixed_basic_resolution: profile.mixed_basic_resolution,
        })
        .collect();

    let models = raw
        .models
        .into_iter()
        .map(|model| {
            let owner = format!("model '{}'", model.name);
            Ok(ModelEntry {
                target: require_target(path, &owner, model.target)?,
                name: model.name,
                source: model.source.unwrap_or_default(),
                repository: model.repository,
                url: model.url,
                match_pattern: model.match_pattern,
                prefer_expression: model.prefer_expression,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let extensions = raw
        .extensions
        .into_iter()
        .map(|ext| {
            let owner = format!("extension '{}'", ext.name);
            Ok(ExtensionEntry {
                target: require_target(path, &owner, ext.target)?,
                name: ext.name,
                repository: ext.repository,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let optional_steps = raw
        .optional_steps
        .into_iter()
        .map(|step| OptionalStep {
            description: step.description.unwrap_or_else(|| step.id.clone()),
            id: step.id,
            shell: step.shell,
            working_directory: step.working_directory,
            enabled_by_default: step.enabled_by_default,
        })
        .collect();

    Ok(InstallManifest {
        schema_version,
        id,
        title,
        base_software,
        dependencies,
        vram_profiles,
        models,
        extensions,
        optional_steps,
    })
}
