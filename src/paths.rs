//! Install-root path resolution with directory-escape protection
//!
//! Every manifest-relative path flows through [`combine_with_root`] or an
//! [`AliasTable`] before it touches the filesystem. Resolution is lexical
//! (`..` and `.` components are folded without consulting the disk, so
//! not-yet-created targets resolve the same as existing ones) and the result
//! must remain a descendant of the install root; anything else is a
//! [`StackforgeError::PathEscape`].

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

use crate::error::{Result, StackforgeError};

/// Normalize a path against the filesystem where possible.
///
/// Existing paths are resolved through `normpath` (which handles symlinked
/// ancestors such as `/var` -> `/private/var` on macOS); non-existent paths
/// fall back to pure lexical resolution. Windows verbatim prefixes are
/// stripped for stable comparisons.
pub fn normalize(path: &Path) -> PathBuf {
    let resolved = match path.normalize() {
        Ok(norm) => norm.into_path_buf(),
        Err(_) => lexical_resolve(path),
    };
    dunce::simplified(&resolved).to_path_buf()
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the top of the stack pops the previous component; excess `..`
/// components above the path's own prefix are preserved so the descendant
/// check still fails for them.
fn lexical_resolve(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                resolved.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(
                    resolved.components().next_back(),
                    Some(Component::Normal(_))
                );
                if last_is_normal {
                    resolved.pop();
                } else {
                    resolved.push(Component::ParentDir.as_os_str());
                }
            }
        }
    }
    resolved
}

/// Lexical confinement check for a manifest-relative path.
///
/// Rejects absolute paths and any traversal whose depth drops below the
/// anchor. Used at manifest validation time; runtime resolution re-checks
/// against the canonical root.
pub fn is_confined_relative(path: &str) -> bool {
    let path = Path::new(path);
    let mut depth: i32 = 0;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return false,
            Component::CurDir => {}
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
    }
    true
}

/// Resolve a manifest-relative path against the install root.
///
/// The result is canonicalized and verified to remain a descendant of the
/// root; absolute inputs and escaping traversals produce a `PathEscape`.
pub fn combine_with_root(root: &Path, relative: &str) -> Result<PathBuf> {
    let escape = || StackforgeError::PathEscape {
        path: relative.to_string(),
        root: root.display().to_string(),
    };

    let rel = Path::new(relative);
    if rel.is_absolute() {
        return Err(escape());
    }

    let norm_root = normalize(root);
    let joined = lexical_resolve(&norm_root.join(rel));
    if !joined.starts_with(&norm_root) {
        return Err(escape());
    }

    Ok(joined)
}

/// Named anchors for relative-path resolution.
///
/// The engine registers `"<installRoot>"` and `"baseSoftware.target"` so
/// manifest entries (pip requirement lists in particular) can anchor on the
/// base software directory instead of the root.
pub struct AliasTable {
    root: PathBuf,
    aliases: HashMap<String, PathBuf>,
}

impl AliasTable {
    /// Create a table rooted at the (normalized) install root
    pub fn new(root: &Path) -> Self {
        let root = normalize(root);
        let mut aliases = HashMap::new();
        aliases.insert("<installRoot>".to_string(), root.clone());
        Self { root, aliases }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register an alias; the path must already be confined to the root
    pub fn insert(&mut self, name: impl Into<String>, path: PathBuf) {
        self.aliases.insert(name.into(), path);
    }

    /// Resolve `path` against the named anchor (or the root when absent).
    ///
    /// Traversal out of the anchor is allowed as long as the final path
    /// stays inside the install root.
    pub fn resolve(&self, relative_to: Option<&str>, path: &str) -> Result<PathBuf> {
        let anchor = match relative_to {
            None => &self.root,
            Some(name) => {
                self.aliases
                    .get(name)
                    .ok_or_else(|| StackforgeError::UnknownPathAlias {
                        alias: name.to_string(),
                    })?
            }
        };

        let rel = Path::new(path);
        if rel.is_absolute() {
            return Err(self.escape(path));
        }

        let joined = lexical_resolve(&anchor.join(rel));
        if !joined.starts_with(&self.root) {
            return Err(self.escape(path));
        }

        Ok(joined)
    }

    fn escape(&self, path: &str) -> StackforgeError {
        StackforgeError::PathEscape {
            path: path.to_string(),
            root: self.root.display().to_string(),
        }
    }
}
