//! Hook-aware merge of a fresh stamp into the cache
//!
//! | cached entry | hook   | rule                |
//! |--------------|--------|---------------------|
//! | absent       | any    | `Adopt`             |
//! | present      | `pre`  | `PreserveCreated`   |
//! | present      | `post` | `MonotonicCreated`  |
//! | present      | `none` | `Overwrite`         |
//!
//! At pre-commit time git log cannot see the commit being formed, so the
//! working-tree mtime is the best "modified" value. At post-commit time the
//! new commit is in history and the fresh stamp is authoritative, except
//! that `created` may never move later than a value already recorded.

use crate::models::{HookMode, ResolvedSource, ResolvedStamp, Stamp};

/// One row of the reconciliation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// No cached entry: take the fresh stamp as is
    Adopt,
    /// Keep cached `created`, take `modified` from the live mtime
    PreserveCreated,
    /// `created = min(cached, fresh)`, `modified` from fresh history
    MonotonicCreated,
    /// Replace the cached entry with the fresh stamp
    Overwrite,
}

impl MergeRule {
    pub fn select(cached_present: bool, hook: HookMode) -> Self {
        match (cached_present, hook) {
            (false, _) => MergeRule::Adopt,
            (true, HookMode::Pre) => MergeRule::PreserveCreated,
            (true, HookMode::Post) => MergeRule::MonotonicCreated,
            (true, HookMode::None) => MergeRule::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub stamp: Stamp,
    pub source: ResolvedSource,
    pub rule: MergeRule,
}

/// Merge `fresh` against the cached entry for the same key.
pub fn reconcile(fresh: &ResolvedStamp, cached: Option<Stamp>, hook: HookMode) -> Reconciled {
    let rule = MergeRule::select(cached.is_some(), hook);
    let (stamp, source) = match (rule, cached) {
        (MergeRule::PreserveCreated, Some(old)) => (
            Stamp::new(old.created, fresh.stat_modify),
            ResolvedSource::CachePreserved,
        ),
        (MergeRule::MonotonicCreated, Some(old)) if old.created < fresh.stamp.created => (
            Stamp::new(old.created, fresh.stamp.modified),
            ResolvedSource::CachePreserved,
        ),
        _ => (fresh.stamp, fresh.source),
    };
    Reconciled {
        stamp,
        source,
        rule,
    }
}
