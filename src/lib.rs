//! git-stamps - stable created/modified timestamps for project files
//!
//! Git history is the source of truth: a file's first commit is its
//! creation time and its latest commit is its modification time. Files with
//! no history fall back to filesystem metadata. Results are cached in a JSON
//! file that can be staged or committed from pre-/post-commit hooks.
//!
//! ```no_run
//! use git_stamps::pipeline::{run, RunOptions};
//! use std::path::PathBuf;
//!
//! let outcome = run(&RunOptions {
//!     project_root: PathBuf::from("/path/to/project"),
//!     ..Default::default()
//! })?;
//! for (path, stamp) in outcome.cache.stamps() {
//!     println!("{path}: {} -> {}", stamp.created, stamp.modified);
//! }
//! # Ok::<(), git_stamps::error::StampError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod files;
pub mod git;
pub mod models;
pub mod pipeline;
pub mod stamps;

pub use cache::StampCache;
pub use error::{StampError, StampResult};
pub use models::{HookMode, Stamp};
pub use pipeline::{run, RunOptions, RunOutcome};
