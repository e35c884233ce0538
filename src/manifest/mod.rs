//! Install manifest model and provider
//!
//! A manifest is a declarative JSON description of one installable AI
//! application stack: the base software to fetch, Python dependency hints,
//! VRAM profiles, model assets, extensions, and optional post-install
//! steps. This module holds:
//! - the plain immutable model types (no behavior beyond lookups)
//! - [`serialization`]: parsing, normalization, and boundary validation
//! - [`provider`]: directory enumeration and change watching
//!
//! Manifests are value objects: validated once at the deserialization
//! boundary, then never mutated. An installation run keeps its own
//! [`ManifestDescriptor`] snapshot, so concurrent edits to the manifest
//! directory never affect a run already in progress.

pub mod provider;
pub mod serialization;
mod watcher;

pub use provider::{ManifestChange, ManifestProvider};

use std::path::PathBuf;

/// One installable application stack, as described by a manifest file
#[derive(Debug, Clone)]
pub struct InstallManifest {
    pub schema_version: String,
    /// Unique id; defaults to the manifest's filename stem
    pub id: String,
    /// Display title; defaults to the id
    pub title: String,
    pub base_software: BaseSoftware,
    pub dependencies: Dependencies,
    pub vram_profiles: Vec<VramProfile>,
    pub models: Vec<ModelEntry>,
    pub extensions: Vec<ExtensionEntry>,
    pub optional_steps: Vec<OptionalStep>,
}

/// The base application the rest of the stack is placed around
#[derive(Debug, Clone)]
pub struct BaseSoftware {
    pub name: String,
    pub repository_url: Option<String>,
    pub git_ref: Option<String>,
    /// Relative path under the install root
    pub target: String,
}

/// Python/CUDA dependency hints and pip requirement lists
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    pub python: Option<String>,
    pub cuda: Option<String>,
    pub pip_requirements: Vec<PipRequirement>,
}

/// A pip requirements file, optionally anchored on a path alias
#[derive(Debug, Clone)]
pub struct PipRequirement {
    /// Path-alias anchor, e.g. `"baseSoftware.target"`; install root if absent
    pub relative_to: Option<String>,
    pub path: String,
}

/// A named preset selecting quantization preferences by available GPU memory
#[derive(Debug, Clone)]
pub struct VramProfile {
    pub id: String,
    pub label: String,
    /// Ordered preference of quantization markers, most preferred first
    pub gguf_preference: Vec<String>,
    pub mixed_basic_resolution: Option<u32>,
}

/// A model asset to place under the install root
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub name: String,
    pub source: String,
    pub repository: Option<String>,
    pub url: Option<String>,
    /// Glob narrowing which repository files are candidates
    pub match_pattern: Option<String>,
    pub prefer_expression: Option<String>,
    /// Relative path under the install root
    pub target: String,
}

/// An extension repository cloned into the stack
#[derive(Debug, Clone)]
pub struct ExtensionEntry {
    pub name: String,
    pub repository: String,
    pub target: String,
}

/// An opt-in/opt-out post-install command, executed through the step runner
#[derive(Debug, Clone)]
pub struct OptionalStep {
    pub id: String,
    pub description: String,
    pub shell: String,
    pub working_directory: Option<String>,
    pub enabled_by_default: bool,
}

impl InstallManifest {
    /// Look up a VRAM profile by id, case-insensitively
    pub fn find_profile(&self, id: &str) -> Option<&VramProfile> {
        self.vram_profiles
            .iter()
            .find(|profile| profile.id.eq_ignore_ascii_case(id))
    }

    /// The profile used when the request does not name one: first listed
    pub fn default_profile(&self) -> Option<&VramProfile> {
        self.vram_profiles.first()
    }

    /// Optional steps that run when the request has no explicit selection
    pub fn default_steps(&self) -> impl Iterator<Item = &OptionalStep> {
        self.optional_steps.iter().filter(|s| s.enabled_by_default)
    }
}

/// A validated manifest together with the file it was loaded from
#[derive(Debug, Clone)]
pub struct ManifestDescriptor {
    pub manifest: InstallManifest,
    pub path: PathBuf,
}

impl ManifestDescriptor {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn title(&self) -> &str {
        &self.manifest.title
    }
}
