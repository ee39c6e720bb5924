//! File list collection
//!
//! Produces the ordered list of files to stamp, either from an explicit list
//! or by walking the project root. The order is deterministic: explicit files
//! keep the order given, walked files are sorted by path.

use crate::cache::normalize_relative;
use crate::error::{StampError, StampResult};
use crate::models::TrackedFile;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories never walked, in addition to hidden ones.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

#[derive(Debug, Clone, Default)]
pub struct FileListOptions {
    /// Explicit files; when non-empty no walk happens
    pub files: Vec<PathBuf>,
    /// Restrict the walk to these directories (relative to the root)
    pub only_in: Vec<PathBuf>,
    /// Glob patterns on the relative path; matches are dropped
    pub block: Vec<String>,
    /// Glob patterns on the relative path; when set only matches are kept
    pub allow: Vec<String>,
}

fn build_globset(patterns: &[String]) -> StampResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| StampError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| StampError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })?;
    Ok(Some(set))
}

/// Collect files under `root` (expected to be canonical).
///
/// `exclude` holds relative keys that must never be stamped, such as the
/// cache file itself.
pub fn collect_files(
    root: &Path,
    opts: &FileListOptions,
    exclude: &[String],
) -> StampResult<Vec<TrackedFile>> {
    let block = build_globset(&opts.block)?;
    let allow = build_globset(&opts.allow)?;

    let candidates = if opts.files.is_empty() {
        walk(root, &opts.only_in)
    } else {
        explicit(root, &opts.files)
    };

    let mut seen = HashSet::new();
    let files: Vec<TrackedFile> = candidates
        .into_iter()
        .filter(|f| !exclude.contains(&f.relative))
        .filter(|f| block.as_ref().map_or(true, |g| !g.is_match(&f.relative)))
        .filter(|f| allow.as_ref().map_or(true, |g| g.is_match(&f.relative)))
        .filter(|f| seen.insert(f.relative.clone()))
        .collect();

    debug!("Collected {} files under {}", files.len(), root.display());
    Ok(files)
}

fn explicit(root: &Path, files: &[PathBuf]) -> Vec<TrackedFile> {
    let mut out = Vec::new();
    for file in files {
        let full = if file.is_absolute() {
            file.clone()
        } else {
            root.join(file)
        };
        let full = match full.canonicalize() {
            Ok(p) if p.is_file() => p,
            Ok(p) => {
                warn!("Skipping {}: not a regular file", p.display());
                continue;
            }
            Err(e) => {
                warn!("Skipping {}: {}", full.display(), e);
                continue;
            }
        };
        match normalize_relative(root, &full) {
            Some(relative) => out.push(TrackedFile {
                full_path: full,
                relative,
            }),
            None => warn!("Skipping {}: outside project root", full.display()),
        }
    }
    out
}

fn walk(root: &Path, only_in: &[PathBuf]) -> Vec<TrackedFile> {
    let starts: Vec<PathBuf> = if only_in.is_empty() {
        vec![root.to_path_buf()]
    } else {
        only_in.iter().map(|d| root.join(d)).collect()
    };

    let mut out = Vec::new();
    for start in starts {
        if !start.is_dir() {
            warn!("Skipping {}: not a directory", start.display());
            continue;
        }

        let walker = WalkBuilder::new(&start)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !DEFAULT_EXCLUDED_DIRS.contains(&name.as_ref())
            })
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(relative) = normalize_relative(root, path) {
                out.push(TrackedFile {
                    full_path: path.to_path_buf(),
                    relative,
                });
            }
        }
    }
    out
}
