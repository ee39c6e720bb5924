//! Stamp resolution and cache reconciliation
//!
//! For each file, the history reader and the stat reader are queried, the
//! resolver picks the trusted source, and the reconciler merges the result
//! against whatever the cache already holds for that key.
//!
//! # Example
//!
//! ```
//! use git_stamps::models::{HookMode, Stamp, StatTimes};
//! use git_stamps::stamps::{reconcile, resolve};
//!
//! let fresh = resolve(&[1000], StatTimes { birth: None, modify: 1500 });
//! assert_eq!(fresh.stamp, Stamp::new(1000, 1000));
//!
//! let merged = reconcile(&fresh, Some(Stamp::new(1000, 1000)), HookMode::Pre);
//! assert_eq!(merged.stamp, Stamp::new(1000, 1500));
//! ```

pub mod fs_stat;
pub mod reconcile;
pub mod resolver;

pub use fs_stat::{stat_times, FsStat};
pub use reconcile::{reconcile, MergeRule, Reconciled};
pub use resolver::{resolve, HistorySource, Resolver, StatSource};
