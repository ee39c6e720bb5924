//! Stamp pipeline
//!
//! Orchestrates one run:
//! 1. Open the repository (fatal if there is none)
//! 2. Stop early when a post-commit hook fires on our own commit
//! 3. Load the cache file
//! 4. Collect the file list
//! 5. Resolve and reconcile every file, in list order
//! 6. Persist the cache (only when writing to file)
//!
//! Files are processed one at a time. Nothing is written until every file
//! has been handled, so an interrupted run never leaves a partial cache.

pub mod persist;

pub use persist::{persist, write_cache, PersistReport};

use crate::cache::{normalize_relative, resolve_cache_path, StampCache};
use crate::error::StampResult;
use crate::files::{collect_files, FileListOptions};
use crate::git::{is_auto_commit, GitHistory};
use crate::models::HookMode;
use crate::stamps::{reconcile, FsStat, Resolver};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub project_root: PathBuf,
    /// Cache file, relative to `project_root` unless absolute
    pub cache_file: PathBuf,
    /// Write the cache back (and stage/commit per `hook`)
    pub output_to_file: bool,
    pub hook: HookMode,
    pub files: FileListOptions,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            cache_file: PathBuf::from(crate::cache::paths::DEFAULT_CACHE_FILE),
            output_to_file: false,
            hook: HookMode::None,
            files: FileListOptions::default(),
            show_progress: false,
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub cache: StampCache,
    /// Files resolved in this run
    pub processed: usize,
    /// Post-commit run skipped because HEAD is our own automated commit
    pub skipped_auto_commit: bool,
    /// Present when the cache was written
    pub persist: Option<PersistReport>,
}

/// Run the full stamp pipeline.
pub fn run(opts: &RunOptions) -> StampResult<RunOutcome> {
    let root = opts
        .project_root
        .canonicalize()
        .unwrap_or_else(|_| opts.project_root.clone());
    let history = GitHistory::open(&root)?;
    let cache_path = resolve_cache_path(&root, &opts.cache_file);

    if opts.hook == HookMode::Post
        && history
            .head_message()
            .is_some_and(|msg| is_auto_commit(&msg))
    {
        info!("HEAD is an automated cache update; nothing to do");
        return Ok(RunOutcome {
            skipped_auto_commit: true,
            ..Default::default()
        });
    }

    let mut cache = match StampCache::load(&cache_path) {
        Ok(cache) => cache,
        Err(e) if opts.output_to_file => return Err(e),
        Err(e) => {
            warn!("{}; continuing with an empty cache", e);
            StampCache::new()
        }
    };

    let exclude: Vec<String> = normalize_relative(&root, &cache_path).into_iter().collect();
    let files = collect_files(&root, &opts.files, &exclude)?;
    info!("Stamping {} files ({} hook)", files.len(), opts.hook);

    let progress = if opts.show_progress && !files.is_empty() {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let resolver = Resolver::new(&history, FsStat);
    let mut processed = 0usize;
    for file in &files {
        progress.set_message(format!("Scraping date info ---> {}", file.relative));
        match resolver.resolve_file(file) {
            Ok(fresh) => {
                let merged = reconcile(&fresh, cache.get(&file.relative), opts.hook);
                debug!(
                    "{}: {:?} via {:?} ({:?})",
                    file.relative, merged.stamp, merged.source, merged.rule
                );
                cache.insert(file.relative.clone(), merged.stamp);
                processed += 1;
            }
            Err(e) => warn!("Skipping {}: {}", file.relative, e),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let persist = if opts.output_to_file {
        Some(persist::persist(&cache, &cache_path, opts.hook, &history)?)
    } else {
        None
    };

    Ok(RunOutcome {
        cache,
        processed,
        skipped_auto_commit: false,
        persist,
    })
}
