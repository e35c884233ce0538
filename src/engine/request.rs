//! Installation request
//!
//! An immutable description of one run: which manifest, where to install,
//! and the knobs the caller may turn (VRAM profile, optional steps, log
//! file). The request owns its manifest descriptor, so edits to the
//! manifest directory after construction never affect the run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::manifest::ManifestDescriptor;

/// Immutable parameters for one installation run
#[derive(Debug, Clone)]
pub struct InstallRequest {
    manifest: ManifestDescriptor,
    install_root: PathBuf,
    vram_profile: Option<String>,
    optional_steps: Option<Vec<String>>,
    log_file: Option<PathBuf>,
}

impl InstallRequest {
    /// Create a request installing `manifest` under `install_root`.
    ///
    /// The root is created on demand when the run starts.
    pub fn new(manifest: ManifestDescriptor, install_root: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            install_root: install_root.into(),
            vram_profile: None,
            optional_steps: None,
            log_file: None,
        }
    }

    /// Select a VRAM profile by id (matched case-insensitively)
    pub fn with_vram_profile(mut self, id: impl Into<String>) -> Self {
        self.vram_profile = Some(id.into());
        self
    }

    /// Run exactly these optional steps instead of the manifest defaults.
    ///
    /// Ids not present in the manifest are silently ignored.
    pub fn with_optional_steps(mut self, ids: Vec<String>) -> Self {
        self.optional_steps = Some(ids);
        self
    }

    /// Write the run log to an explicit path instead of the derived one
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn manifest(&self) -> &ManifestDescriptor {
        &self.manifest
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn vram_profile(&self) -> Option<&str> {
        self.vram_profile.as_deref()
    }

    pub fn optional_steps(&self) -> Option<&[String]> {
        self.optional_steps.as_deref()
    }

    /// The log file for a run started at `started`: the explicit path if
    /// given, else `install-YYYYMMDD-HHMMSS.log` under the install root.
    pub fn resolve_log_path(&self, started: DateTime<Local>) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            self.install_root
                .join(format!("install-{}.log", started.format("%Y%m%d-%H%M%S")))
        })
    }
}
