//! Staging and committing the cache file
//!
//! Both operations go through libgit2, so no hooks fire. Commits made here
//! carry [`AUTO_COMMIT_MARKER`] in their subject line so that hooks and CI
//! can recognise them without relying on author identity.

use crate::error::{StampError, StampResult};
use git2::{Index, Oid, Repository};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Greppable marker placed at the start of every automated commit subject.
pub const AUTO_COMMIT_MARKER: &str = "[git-stamps:auto-update]";

pub fn auto_commit_message(repo_relative: &str) -> String {
    format!("{} update {}", AUTO_COMMIT_MARKER, repo_relative)
}

/// Whether a commit message was produced by [`commit_path`].
pub fn is_auto_commit(message: &str) -> bool {
    message.contains(AUTO_COMMIT_MARKER)
}

/// Point the repository at the index git exported for the running hook.
///
/// During `git commit -a` or `git commit <paths>` git runs hooks against a
/// temporary index named by `GIT_INDEX_FILE` while holding the lock on the
/// regular one.
fn use_hook_index(repo: &Repository) -> Result<(), git2::Error> {
    if let Some(path) = std::env::var_os("GIT_INDEX_FILE").filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        debug!("Using index from GIT_INDEX_FILE: {}", path.display());
        let mut index = Index::open(&path)?;
        repo.set_index(&mut index)?;
    }
    Ok(())
}

/// Add `repo_relative` to the index (the equivalent of `git add`).
pub fn stage_path(repo: &Repository, repo_relative: &str) -> StampResult<()> {
    let stage_err = |source| StampError::Stage {
        path: repo_relative.to_string(),
        source,
    };
    use_hook_index(repo).map_err(stage_err)?;
    let mut index = repo.index().map_err(stage_err)?;
    index.add_path(Path::new(repo_relative)).map_err(stage_err)?;
    index.write().map_err(stage_err)?;
    debug!("Staged {}", repo_relative);
    Ok(())
}

/// Commit the staged version of `repo_relative` on top of HEAD.
///
/// The new tree is HEAD's tree with only that one entry replaced, so other
/// staged changes are left staged and out of the commit.
pub fn commit_path(repo: &Repository, repo_relative: &str, message: &str) -> StampResult<Oid> {
    let commit_err = |source| StampError::Commit {
        path: repo_relative.to_string(),
        source,
    };

    let staged = repo
        .index()
        .map_err(commit_err)?
        .get_path(Path::new(repo_relative), 0)
        .ok_or_else(|| commit_err(git2::Error::from_str("path is not staged")))?;

    let head = repo.head().ok().and_then(|h| h.peel_to_commit().ok());

    let mut scratch = Index::new().map_err(commit_err)?;
    if let Some(head) = &head {
        let head_tree = head.tree().map_err(commit_err)?;
        scratch.read_tree(&head_tree).map_err(commit_err)?;
    }
    scratch.add(&staged).map_err(commit_err)?;
    let tree_id = scratch.write_tree_to(repo).map_err(commit_err)?;
    let tree = repo.find_tree(tree_id).map_err(commit_err)?;

    let sig = repo.signature().map_err(commit_err)?;
    let parents: Vec<&git2::Commit> = head.iter().collect();
    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(commit_err)?;
    debug!("Committed {} as {}", repo_relative, oid);
    Ok(oid)
}
