//! Git history extraction using libgit2
//!
//! Walks history from HEAD once, diffing every commit against its parents,
//! and records the commit time for each path the commit touched. A merge
//! touches a path only when the merged result differs from every parent,
//! matching the commits `git log -- <path>` lists. Per-file lookups are then
//! served from that index.

use crate::error::{StampError, StampResult};
use crate::stamps::HistorySource;
use git2::{Repository, Sort, Tree};
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Repository-relative path -> commit times, oldest first.
type TimeIndex = HashMap<String, Vec<i64>>;

/// Git history reader using libgit2.
pub struct GitHistory {
    repo: Repository,
    workdir: PathBuf,
    times: OnceCell<Result<TimeIndex, String>>,
}

impl GitHistory {
    /// Open the repository containing `path` (or any subdirectory of it).
    pub fn open(path: &Path) -> StampResult<Self> {
        let repo = Repository::discover(path).map_err(|source| StampError::NotARepository {
            path: path.to_path_buf(),
            source,
        })?;
        let workdir = repo
            .workdir()
            .map(|w| w.canonicalize().unwrap_or_else(|_| w.to_path_buf()))
            .ok_or_else(|| StampError::NotARepository {
                path: path.to_path_buf(),
                source: git2::Error::from_str("bare repository has no working directory"),
            })?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self {
            repo,
            workdir,
            times: OnceCell::new(),
        })
    }

    /// Canonical working directory of the repository.
    pub fn repo_root(&self) -> &Path {
        &self.workdir
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Convert a path into the forward-slash form git uses for index and
    /// tree entries. `None` if the path lies outside the working directory.
    pub fn relative_to_repo(&self, path: &Path) -> Option<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        };
        let absolute = absolute.canonicalize().unwrap_or(absolute);
        let rel = absolute.strip_prefix(&self.workdir).ok()?;
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// First line of the HEAD commit message, if HEAD points at a commit.
    pub fn head_message(&self) -> Option<String> {
        let commit = self.repo.head().ok()?.peel_to_commit().ok()?;
        commit.summary().map(str::to_string)
    }

    /// Commit times touching `repo_relative`, oldest first.
    pub fn file_commit_times(&self, repo_relative: &str) -> StampResult<Vec<i64>> {
        match self.times.get_or_init(|| self.build_index().map_err(|e| e.to_string())) {
            Ok(index) => Ok(index.get(repo_relative).cloned().unwrap_or_default()),
            Err(reason) => Err(StampError::HistoryUnavailable {
                path: repo_relative.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    fn build_index(&self) -> Result<TimeIndex, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut index: TimeIndex = HashMap::new();
        let mut commit_count = 0usize;

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let seconds = commit.time().seconds();
            let tree = commit.tree()?;

            let mut touched: Option<HashSet<String>> = None;
            for parent in commit.parents() {
                let changed = self.changed_paths(Some(&parent.tree()?), &tree)?;
                touched = Some(match touched {
                    None => changed,
                    Some(prev) => prev.intersection(&changed).cloned().collect(),
                });
            }
            let touched = match touched {
                Some(paths) => paths,
                None => self.changed_paths(None, &tree)?,
            };

            for path in touched {
                index.entry(path).or_default().push(seconds);
            }
            commit_count += 1;
        }

        for times in index.values_mut() {
            times.sort_unstable();
        }
        debug!(
            "Indexed {} paths across {} commits",
            index.len(),
            commit_count
        );
        Ok(index)
    }

    /// Paths that differ between `old` (or the empty tree) and `new`.
    fn changed_paths(
        &self,
        old: Option<&Tree<'_>>,
        new: &Tree<'_>,
    ) -> Result<HashSet<String>, git2::Error> {
        let diff = self.repo.diff_tree_to_tree(old, Some(new), None)?;
        let mut paths = HashSet::new();
        diff.foreach(
            &mut |delta, _| {
                if let Some(path) = delta.new_file().path() {
                    paths.insert(path.to_string_lossy().replace('\\', "/"));
                }
                true
            },
            None,
            None,
            None,
        )?;
        Ok(paths)
    }
}

impl HistorySource for GitHistory {
    fn commit_times(&self, path: &Path) -> StampResult<Vec<i64>> {
        let rel = self
            .relative_to_repo(path)
            .ok_or_else(|| StampError::HistoryUnavailable {
                path: path.display().to_string(),
                reason: "path is outside the repository working directory".to_string(),
            })?;
        self.file_commit_times(&rel)
    }
}
