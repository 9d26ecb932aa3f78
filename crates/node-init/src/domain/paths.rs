//! # Managed Root Predicate
//!
//! Decides whether a missing directory may be created automatically.
//! Comparison is lexical: callers pass absolute paths and nothing here
//! touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Whether `path` lies strictly below `root`.
///
/// `root` itself is not under `root`. `.` and `..` components are resolved
/// lexically first, so `root/a/../..` is not under `root`.
pub fn is_under_path(root: &Path, path: &Path) -> bool {
    let root = normalize(root);
    let path = normalize(path);
    path != root && path.starts_with(&root)
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
