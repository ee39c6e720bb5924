//! Stamp resolver
//!
//! Git history wins whenever it has anything to say about a file: the first
//! commit is the creation time and the last commit is the modification
//! time. Checkouts and clones reset mtimes, commits do not. Without history
//! the filesystem is used, degrading from birth time to mtime when the OS
//! cannot report birth time.

use crate::error::StampResult;
use crate::models::{ResolvedSource, ResolvedStamp, Stamp, StatTimes, TrackedFile};
use std::path::Path;
use tracing::debug;

/// Provides commit times touching a file.
pub trait HistorySource {
    /// Commit times (epoch seconds) of every commit touching `path`, oldest
    /// first. An empty vec means the file has no history yet.
    fn commit_times(&self, path: &Path) -> StampResult<Vec<i64>>;
}

impl<T: HistorySource + ?Sized> HistorySource for &T {
    fn commit_times(&self, path: &Path) -> StampResult<Vec<i64>> {
        (**self).commit_times(path)
    }
}

/// Provides OS-level timestamps for a file.
pub trait StatSource {
    fn stat(&self, path: &Path) -> std::io::Result<StatTimes>;
}

/// Pick created/modified for one file from its history and stat times.
///
/// `history` must be ordered oldest first.
pub fn resolve(history: &[i64], stat: StatTimes) -> ResolvedStamp {
    match (history.first(), history.last()) {
        (Some(&first), Some(&last)) => ResolvedStamp {
            stamp: Stamp::new(first, last),
            source: ResolvedSource::GitHistory,
            stat_modify: stat.modify,
        },
        _ => ResolvedStamp {
            stamp: Stamp::new(stat.birth.unwrap_or(stat.modify), stat.modify),
            source: ResolvedSource::FilesystemStat,
            stat_modify: stat.modify,
        },
    }
}

/// Binds a history provider and a stat provider together.
pub struct Resolver<H, S> {
    history: H,
    stat: S,
}

impl<H: HistorySource, S: StatSource> Resolver<H, S> {
    pub fn new(history: H, stat: S) -> Self {
        Self { history, stat }
    }

    /// Resolve a stamp for one tracked file.
    ///
    /// History failures are treated as "no history". Only a failing stat
    /// (file vanished, permission denied) is returned as an error.
    pub fn resolve_file(&self, file: &TrackedFile) -> std::io::Result<ResolvedStamp> {
        let history = match self.history.commit_times(&file.full_path) {
            Ok(times) => times,
            Err(e) => {
                debug!("{}; falling back to file stat", e);
                Vec::new()
            }
        };
        let stat = self.stat.stat(&file.full_path)?;
        let resolved = resolve(&history, stat);
        debug!(
            "{} -> {:?} from {:?} ({} commits)",
            file.relative,
            resolved.stamp,
            resolved.source,
            history.len()
        );
        Ok(resolved)
    }
}
