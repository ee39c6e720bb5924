//! Core data models for git-stamps
//!
//! These types flow between the readers, the resolver, the reconciler and
//! the cache store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Created/modified pair for a single file, in epoch seconds.
///
/// `created <= modified` is the normal shape but is not enforced: a single
/// commit gives `created == modified`, and clock skew or rewritten history
/// can produce `created > modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    pub created: i64,
    pub modified: i64,
}

impl Stamp {
    pub fn new(created: i64, modified: i64) -> Self {
        Self { created, modified }
    }
}

/// Which commit hook (if any) the current run is executing inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookMode {
    /// No git staging interaction
    #[default]
    None,
    /// Inside a pre-commit hook: stage the cache, never commit
    Pre,
    /// Inside a post-commit hook: stage and commit the cache as a follow-up
    Post,
}

impl HookMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookMode::None => "none",
            HookMode::Pre => "pre",
            HookMode::Post => "post",
        }
    }
}

impl fmt::Display for HookMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(HookMode::None),
            "pre" => Ok(HookMode::Pre),
            "post" => Ok(HookMode::Post),
            other => Err(format!(
                "'{}' is not a valid hook mode (expected none, pre or post)",
                other
            )),
        }
    }
}

/// Where a resolved stamp's values came from. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSource {
    GitHistory,
    FilesystemStat,
    CachePreserved,
}

/// Raw OS metadata for a file. `birth` is `None` when the platform or
/// filesystem cannot report creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatTimes {
    pub birth: Option<i64>,
    pub modify: i64,
}

/// Output of the resolver, input to the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStamp {
    pub stamp: Stamp,
    pub source: ResolvedSource,
    /// Live working-tree mtime, kept even when `stamp` came from history
    pub stat_modify: i64,
}

/// One entry produced by the file list: absolute path plus the
/// forward-slash project-relative key used in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub full_path: PathBuf,
    pub relative: String,
}
