//! CLI definition and handler

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use git_stamps::cache::paths::DEFAULT_CACHE_FILE;
use git_stamps::config::{load_project_config, ProjectConfig};
use git_stamps::files::FileListOptions;
use git_stamps::pipeline::{self, RunOptions, RunOutcome};
use git_stamps::HookMode;
use std::path::{Path, PathBuf};

/// Parse and validate a hook mode (none, pre, post)
fn parse_hook(s: &str) -> Result<HookMode, String> {
    s.parse()
}

/// Extract created/modified timestamps for files, from git history first
/// and file stats second.
#[derive(Parser, Debug)]
#[command(name = "git-stamps")]
#[command(
    version,
    about = "Stable created/modified timestamps per file, from git history with a filesystem fallback",
    after_help = "\
Examples:
  git-stamps                                     Print stamps for every file
  git-stamps alpha.txt subdir/charlie.txt        Only these files
  git-stamps --out --out-file cache.json         Write/update cache.json
  git-stamps --no-out                            Print even if git-stamps.toml writes
  git-stamps --out --hook pre                    From a pre-commit hook: write and stage
  git-stamps --out --hook post                   From a post-commit hook: write and commit

Project defaults can be set in git-stamps.toml under [defaults]."
)]
pub struct Cli {
    /// Files to stamp, relative to the project root
    #[arg(value_name = "FILES")]
    pub inputs: Vec<PathBuf>,

    /// Files to stamp (comma separated, repeatable)
    #[arg(long, alias = "file", value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    /// Only walk these directories (comma separated, repeatable)
    #[arg(long, alias = "dirs", value_delimiter = ',')]
    pub only_in: Vec<PathBuf>,

    /// Glob patterns to exclude (comma separated, repeatable)
    #[arg(long = "block-files", alias = "blocklist", value_delimiter = ',')]
    pub block: Vec<String>,

    /// Glob patterns to include exclusively (comma separated, repeatable)
    #[arg(long = "allow-files", alias = "allowlist", value_delimiter = ',')]
    pub allow: Vec<String>,

    /// Write the cache file instead of printing the stamps
    #[arg(long, alias = "out", overrides_with = "no_output_to_file")]
    pub output_to_file: bool,

    /// Print the stamps even if git-stamps.toml sets output_to_file
    #[arg(long, alias = "no-out", overrides_with = "output_to_file")]
    pub no_output_to_file: bool,

    /// Cache file name, relative to the project root [default: timestamps.json]
    #[arg(long = "output-file-name", alias = "out-file")]
    pub output_file: Option<PathBuf>,

    /// Commit hook this run is invoked from: none, pre, post [default: none]
    #[arg(long = "git-commit-hook", alias = "hook", value_parser = parse_hook)]
    pub hook: Option<HookMode>,

    /// Project root (default: current directory)
    #[arg(long = "project-root", alias = "root-dir", default_value = ".")]
    pub project_root: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Merge flags with project config; flags win.
    fn into_run_options(self, root: &Path, config: ProjectConfig) -> RunOptions {
        let defaults = config.defaults;

        let mut files = self.files;
        files.extend(self.inputs);

        let show_progress = !self.quiet && console::Term::stderr().is_term();

        RunOptions {
            project_root: root.to_path_buf(),
            cache_file: self
                .output_file
                .or(defaults.output_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
            output_to_file: flag_or_config(
                self.output_to_file,
                self.no_output_to_file,
                defaults.output_to_file,
            ),
            hook: self.hook.or(defaults.hook).unwrap_or_default(),
            files: FileListOptions {
                files,
                only_in: or_default(self.only_in, defaults.only_in),
                block: or_default(self.block, defaults.block),
                allow: or_default(self.allow, defaults.allow),
            },
            show_progress,
        }
    }
}

/// `--x` / `--no-x` pair over an optional config value. The last flag given
/// wins (clap clears the other one).
fn flag_or_config(on: bool, off: bool, config: Option<bool>) -> bool {
    if off {
        false
    } else {
        on || config.unwrap_or(false)
    }
}

fn or_default<T>(flag: Vec<T>, config: Vec<T>) -> Vec<T> {
    if flag.is_empty() {
        config
    } else {
        flag
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let root = cli
        .project_root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", cli.project_root.display()))?;
    let config = load_project_config(&root);
    let opts = cli.into_run_options(&root, config);

    let outcome = pipeline::run(&opts)?;
    report(&opts, &outcome)
}

fn report(opts: &RunOptions, outcome: &RunOutcome) -> Result<()> {
    if outcome.skipped_auto_commit {
        println!(
            "{} HEAD is an automated timestamps commit, nothing to update",
            style("-").dim()
        );
        return Ok(());
    }

    if !opts.output_to_file {
        let json = serde_json::to_string_pretty(outcome.cache.as_json())
            .context("Failed to render timestamps")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{} timestamps file updated", style("✓").green());
    if let Some(persisted) = &outcome.persist {
        if let Some(commit) = persisted.commit {
            println!("  committed {}", style(commit).cyan());
        } else if persisted.staged {
            println!("  staged {}", style(persisted.path.display()).cyan());
        }
        if let Some(err) = &persisted.git_error {
            eprintln!("{} {}", style("warning:").yellow(), err);
        }
    }
    Ok(())
}
