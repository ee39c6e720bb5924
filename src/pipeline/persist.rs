//! Persisting the reconciled cache
//!
//! Writing the file and touching git are independent steps. A failed write
//! is fatal; a failed stage or commit is reported and leaves the written
//! file in place.

use crate::cache::StampCache;
use crate::error::{StampError, StampResult};
use crate::git::{self, GitHistory};
use crate::models::HookMode;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// What [`persist`] did.
#[derive(Debug, Clone, Default)]
pub struct PersistReport {
    pub path: PathBuf,
    pub staged: bool,
    pub commit: Option<git2::Oid>,
    /// Stage/commit failure, if any. The file itself was still written.
    pub git_error: Option<String>,
}

/// Serialize `cache` to `path`, creating parent directories.
///
/// The bytes go to a uniquely named temp file in the target directory which
/// is then renamed over `path`, so readers never observe a half-written
/// cache and no other file in that directory is touched.
pub fn write_cache(cache: &StampCache, path: &Path) -> StampResult<()> {
    let write_err = |source: std::io::Error| StampError::CacheWrite {
        path: path.to_path_buf(),
        source,
    };
    let bytes = cache.serialize()?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(write_err)?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp_file = NamedTempFile::new_in(parent).map_err(write_err)?;
    // Temp files are created owner-only; keep the mode a plain write would give.
    if let Some(perms) = target_permissions(path) {
        tmp_file
            .as_file()
            .set_permissions(perms)
            .map_err(write_err)?;
    }
    tmp_file.write_all(&bytes).map_err(write_err)?;
    // On failure the temp file is dropped along with the error, which removes it.
    tmp_file.persist(path).map_err(|e| write_err(e.error))?;
    debug!("Saved cache with {} entries to {}", cache.len(), path.display());
    Ok(())
}

/// Permissions for the rewritten cache: the existing file's, else 0644.
fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Write the cache, then stage (`pre`) or stage and commit (`post`) it.
pub fn persist(
    cache: &StampCache,
    path: &Path,
    hook: HookMode,
    history: &GitHistory,
) -> StampResult<PersistReport> {
    write_cache(cache, path)?;

    let mut report = PersistReport {
        path: path.to_path_buf(),
        ..Default::default()
    };
    if hook == HookMode::None {
        return Ok(report);
    }

    let Some(rel) = history.relative_to_repo(path) else {
        let msg = format!(
            "{} is outside the repository; not staging it",
            path.display()
        );
        warn!("{}", msg);
        report.git_error = Some(msg);
        return Ok(report);
    };

    if let Err(e) = git::stage_path(history.repository(), &rel) {
        warn!("{}", e);
        report.git_error = Some(e.to_string());
        return Ok(report);
    }
    report.staged = true;
    info!("Staged {}", rel);

    if hook == HookMode::Post {
        let message = git::auto_commit_message(&rel);
        match git::commit_path(history.repository(), &rel, &message) {
            Ok(oid) => {
                info!("Committed {} in {}", rel, oid);
                report.commit = Some(oid);
            }
            Err(e) => {
                warn!("{}", e);
                report.git_error = Some(e.to_string());
            }
        }
    }
    Ok(report)
}
