//! Git access
//!
//! - [`history`]: commit times per file, read through libgit2
//! - [`index`]: staging and committing the cache file from inside hooks

pub mod history;
pub mod index;

pub use history::GitHistory;
pub use index::{
    auto_commit_message, commit_path, is_auto_commit, stage_path, AUTO_COMMIT_MARKER,
};
