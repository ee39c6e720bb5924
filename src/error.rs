//! Error taxonomy
//!
//! Only `NotARepository` and the cache write/read failures abort a run.
//! History and stat problems are recovered where they occur, and staging
//! or commit failures are downgraded to warnings by the pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("Fatal: {} is not inside a git repository. Please run `git init`.", path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No git history for {path}: {reason}")]
    HistoryUnavailable { path: String, reason: String },

    #[error("Could not read cache file {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write cache file {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to stage {path}: {source}")]
    Stage {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to commit {path}: {source}")]
    Commit {
        path: String,
        #[source]
        source: git2::Error,
    },
}

pub type StampResult<T> = Result<T, StampError>;
