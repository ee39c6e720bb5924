//! Cache path utilities

use std::path::{Component, Path, PathBuf};

/// Default cache file name, relative to the project root.
pub const DEFAULT_CACHE_FILE: &str = "timestamps.json";

/// Resolve the cache file location. Relative names are taken from the
/// project root, not the current directory.
pub fn resolve_cache_path(project_root: &Path, file_name: &Path) -> PathBuf {
    if file_name.is_absolute() {
        file_name.to_path_buf()
    } else {
        project_root.join(file_name)
    }
}

/// Forward-slash form of `path` relative to `root`, used as the cache key.
///
/// `.` components are dropped and `..` pops the previous component. Returns
/// `None` when the path is not under `root`.
pub fn normalize_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            _ => {}
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
