//! Filesystem stat reader

use super::resolver::StatSource;
use crate::models::StatTimes;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Stat reader backed by `std::fs::metadata`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStat;

impl StatSource for FsStat {
    fn stat(&self, path: &Path) -> std::io::Result<StatTimes> {
        stat_times(path)
    }
}

/// Read birth and modify time for `path`.
///
/// Birth time support depends on platform, kernel and filesystem. When it is
/// missing (or reported as the epoch) `birth` is `None`.
pub fn stat_times(path: &Path) -> std::io::Result<StatTimes> {
    let meta = std::fs::metadata(path)?;
    let modify = epoch_secs(meta.modified()?);
    let birth = match meta.created() {
        Ok(t) => Some(epoch_secs(t)).filter(|&secs| secs > 0),
        Err(e) => {
            debug!("Birth time unavailable for {}: {}", path.display(), e);
            None
        }
    };
    Ok(StatTimes { birth, modify })
}

fn epoch_secs(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
