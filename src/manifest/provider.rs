//! Manifest directory provider
//!
//! Enumerates, parses, and validates `*.json` manifests from a flat
//! directory, and exposes a change-notification channel backed by a
//! filesystem watcher. The provider holds no installation state: `load` is
//! idempotent and side-effect-free on disk, and each call re-reads the
//! directory from scratch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use parking_lot::Mutex;

use super::serialization::parse_manifest;
use super::watcher::ManifestWatcher;
use super::ManifestDescriptor;
use crate::error::{Result, StackforgeError};
use crate::logging::LogSink;

/// Notification that the manifest directory's file set changed.
///
/// One event is emitted per filesystem event batch touching `*.json` files;
/// debouncing (if any) is the consumer's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestChange;

/// Discovers and validates manifests from a directory
pub struct ManifestProvider {
    directory: PathBuf,
    log: Arc<dyn LogSink>,
    watcher: Mutex<Option<ManifestWatcher>>,
}

impl ManifestProvider {
    pub fn new(directory: impl Into<PathBuf>, log: Arc<dyn LogSink>) -> Self {
        Self {
            directory: directory.into(),
            log,
            watcher: Mutex::new(None),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load every valid manifest in the directory, sorted by filename.
    ///
    /// Malformed or structurally invalid files are skipped with one warning
    /// each; a bad file never aborts the batch.
    pub fn load(&self) -> Result<Vec<ManifestDescriptor>> {
        if !self.directory.is_dir() {
            return Err(StackforgeError::ManifestDirectoryNotFound {
                path: self.directory.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.directory)
            .map_err(StackforgeError::from)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_manifest_file(path))
            .collect();
        files.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));

        let mut descriptors = Vec::with_capacity(files.len());
        for path in files {
            match self.load_one(&path) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => {
                    self.log.warn(&format!(
                        "Skipping manifest {}: {}",
                        path.display(),
                        err
                    ));
                }
            }
        }

        Ok(descriptors)
    }

    fn load_one(&self, path: &Path) -> Result<ManifestDescriptor> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StackforgeError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let manifest = parse_manifest(&content, path)?;
        Ok(ManifestDescriptor {
            manifest,
            path: path.to_path_buf(),
        })
    }

    /// Find one manifest by id
    pub fn find(&self, id: &str) -> Result<ManifestDescriptor> {
        self.load()?
            .into_iter()
            .find(|descriptor| descriptor.id() == id)
            .ok_or_else(|| StackforgeError::ManifestNotFound { id: id.to_string() })
    }

    /// Start watching the directory and return the change channel.
    ///
    /// The watcher lives as long as the provider (or until [`dispose`]);
    /// dropping either end deterministically unsubscribes from filesystem
    /// events.
    ///
    /// [`dispose`]: ManifestProvider::dispose
    pub fn watch(&self) -> Result<Receiver<ManifestChange>> {
        let (tx, rx): (Sender<ManifestChange>, Receiver<ManifestChange>) = channel();
        let watcher = ManifestWatcher::spawn(&self.directory, tx)?;
        *self.watcher.lock() = Some(watcher);
        Ok(rx)
    }

    /// Stop watching; pending receivers observe a disconnect
    pub fn dispose(&self) {
        *self.watcher.lock() = None;
    }
}

pub(super) fn is_manifest_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
