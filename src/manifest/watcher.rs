//! Filesystem watcher for the manifest directory
//!
//! Maps raw notify events onto a single coalesced "the manifest set
//! changed" notification. The watcher owns its notify handle; dropping it
//! unsubscribes from filesystem events deterministically.

use std::path::Path;
use std::sync::mpsc::Sender;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::provider::ManifestChange;
use crate::error::{Result, StackforgeError};

pub(super) struct ManifestWatcher {
    _watcher: RecommendedWatcher,
}

impl ManifestWatcher {
    /// Watch `directory` (non-recursive) and send one [`ManifestChange`]
    /// per event batch that touches a `*.json` file.
    pub(super) fn spawn(directory: &Path, tx: Sender<ManifestChange>) -> Result<Self> {
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    if is_manifest_event(&event) {
                        // Receiver may be gone; nothing to do then.
                        let _ = tx.send(ManifestChange);
                    }
                }
            })
            .map_err(|e| StackforgeError::WatchFailed {
                reason: e.to_string(),
            })?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| StackforgeError::WatchFailed {
                reason: e.to_string(),
            })?;

        Ok(Self { _watcher: watcher })
    }
}

fn is_manifest_event(event: &notify::Event) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    })
}
