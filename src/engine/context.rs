//! Per-run installation context
//!
//! Owned exclusively by one engine run and dropped when the run completes.
//! Holds the resolved install root, the path-alias table used for
//! `relativeTo` anchors, and the lazily-resolved VRAM profile.

use std::cell::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

use super::request::InstallRequest;
use crate::error::Result;
use crate::logging::LogSink;
use crate::manifest::{InstallManifest, OptionalStep, VramProfile};
use crate::paths::AliasTable;

pub struct InstallContext<'a> {
    request: &'a InstallRequest,
    log: Arc<dyn LogSink>,
    aliases: AliasTable,
    profile: OnceCell<Option<VramProfile>>,
}

impl<'a> InstallContext<'a> {
    /// Build the context for a run.
    ///
    /// Registers the `baseSoftware.target` alias, which also verifies the
    /// base target is confined to the root before any stage runs.
    pub fn new(request: &'a InstallRequest, log: Arc<dyn LogSink>) -> Result<Self> {
        let mut aliases = AliasTable::new(request.install_root());
        let base_target = aliases.resolve(None, &request.manifest().manifest.base_software.target)?;
        aliases.insert("baseSoftware.target", base_target);

        Ok(Self {
            request,
            log,
            aliases,
            profile: OnceCell::new(),
        })
    }

    pub fn manifest(&self) -> &InstallManifest {
        &self.request.manifest().manifest
    }

    pub fn request(&self) -> &InstallRequest {
        self.request
    }

    pub fn log(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    pub fn root(&self) -> &std::path::Path {
        self.aliases.root()
    }

    /// Resolve a manifest-relative path against an alias anchor (or the
    /// root), confined to the install root
    pub fn resolve(&self, relative_to: Option<&str>, path: &str) -> Result<PathBuf> {
        self.aliases.resolve(relative_to, path)
    }

    /// Resolve a root-relative target path
    pub fn target(&self, path: &str) -> Result<PathBuf> {
        self.aliases.resolve(None, path)
    }

    /// The directory the base software lands in
    pub fn base_software_dir(&self) -> Result<PathBuf> {
        self.target(&self.manifest().base_software.target)
    }

    /// The VRAM profile for this run, resolved once on first use.
    ///
    /// A requested id is matched case-insensitively; an unknown or absent
    /// id falls back to the first listed profile; a manifest without
    /// profiles yields `None` and profile-dependent behavior is skipped.
    pub fn vram_profile(&self) -> Option<&VramProfile> {
        self.profile
            .get_or_init(|| {
                let manifest = self.manifest();
                self.request
                    .vram_profile()
                    .and_then(|id| manifest.find_profile(id))
                    .or_else(|| manifest.default_profile())
                    .cloned()
            })
            .as_ref()
    }

    /// The optional steps selected for this run, in manifest order.
    ///
    /// An explicit non-empty id set wins (unknown ids silently ignored);
    /// otherwise every step flagged `enabledByDefault` runs.
    pub fn selected_steps(&self) -> Vec<&OptionalStep> {
        let manifest = self.manifest();
        match self.request.optional_steps() {
            Some(ids) if !ids.is_empty() => manifest
                .optional_steps
                .iter()
                .filter(|step| ids.iter().any(|id| id == &step.id))
                .collect(),
            _ => manifest.default_steps().collect(),
        }
    }
}
