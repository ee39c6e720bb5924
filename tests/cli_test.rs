//! CLI contract tests
//!
//! Runs the built binary against throwaway repositories and checks output
//! modes, hook flags and exit codes.

mod common;

use common::*;
use std::path::Path;
use std::process::Command;

fn git_stamps_bin() -> String {
    env!("CARGO_BIN_EXE_git-stamps").to_string()
}

fn run_cli(dir: &Path, extra_args: &[&str]) -> (i32, String, String) {
    run_cli_with_index(dir, extra_args, None)
}

/// Run the binary the way a hook does, optionally with `GIT_INDEX_FILE` set.
fn run_cli_with_index(
    dir: &Path,
    extra_args: &[&str],
    index_file: Option<&Path>,
) -> (i32, String, String) {
    let mut cmd = Command::new(git_stamps_bin());
    cmd.arg("--project-root")
        .arg(dir)
        .arg("--quiet")
        .args(extra_args)
        .env_remove("RUST_LOG");
    match index_file {
        Some(path) => cmd.env("GIT_INDEX_FILE", path),
        None => cmd.env_remove("GIT_INDEX_FILE"),
    };
    let output = cmd.output().expect("Failed to run git-stamps");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (code, stdout, stderr)
}

fn setup_test_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    write_file(dir.path(), "alpha.txt", "alpha");
    write_file(dir.path(), "bravo.txt", "bravo");
    write_file(dir.path(), "subdir/charlie.txt", "charlie");
    write_file(dir.path(), ".dotdir/hidden.txt", "hidden");
    commit_at(
        &repo,
        &["alpha.txt", "bravo.txt", "subdir/charlie.txt", ".dotdir/hidden.txt"],
        1000,
        "added files",
    );
    write_file(dir.path(), "alpha.txt", "alpha v2");
    commit_at(&repo, &["alpha.txt"], 1500, "edit alpha");
    dir
}

#[test]
fn test_prints_mapping_without_writing() {
    let dir = setup_test_repo();
    let (code, stdout, _) = run_cli(dir.path(), &[]);
    assert_eq!(code, 0);

    let v: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(v["alpha.txt"]["created"], 1000);
    assert_eq!(v["alpha.txt"]["modified"], 1500);
    assert_eq!(v["subdir/charlie.txt"]["modified"], 1000);
    assert!(v.get(".dotdir/hidden.txt").is_none(), "dot dirs are skipped");
    assert!(!dir.path().join("timestamps.json").exists());
}

#[test]
fn test_explicit_files_only() {
    let dir = setup_test_repo();
    let (code, stdout, _) = run_cli(dir.path(), &["alpha.txt"]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("alpha.txt"));
}

#[test]
fn test_output_to_file_writes_cache() {
    let dir = setup_test_repo();
    let (code, stdout, _) = run_cli(dir.path(), &["--out", "--out-file", "cache.json"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timestamps file updated"));

    let saved = read_json(&dir.path().join("cache.json"));
    assert_eq!(saved["alpha.txt"]["created"], 1000);
    assert_eq!(saved["bravo.txt"]["modified"], 1000);
    assert!(saved.get("cache.json").is_none(), "cache never stamps itself");
}

#[test]
fn test_post_hook_commits_cache() {
    let dir = setup_test_repo();
    let (code, _, _) = run_cli(
        dir.path(),
        &["--out", "--out-file", "cache.json", "--git-commit-hook", "post"],
    );
    assert_eq!(code, 0);

    let repo = git2::Repository::open(dir.path()).unwrap();
    assert!(head_message(&repo).starts_with(git_stamps::git::AUTO_COMMIT_MARKER));
    let tree = repo.head().unwrap().peel_to_tree().unwrap();
    assert!(tree.get_path(Path::new("cache.json")).is_ok());

    // Second invocation from the hook fired by our own commit is a no-op.
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--out", "--out-file", "cache.json", "--git-commit-hook", "post"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("nothing to update"));
}

#[test]
fn test_pre_hook_stages_without_commit() {
    let dir = setup_test_repo();
    let (code, _, _) = run_cli(dir.path(), &["--out", "--hook", "pre"]);
    assert_eq!(code, 0);

    let repo = git2::Repository::open(dir.path()).unwrap();
    assert_eq!(head_message(&repo), "edit alpha");
    let index = repo.index().unwrap();
    assert!(index.get_path(Path::new("timestamps.json"), 0).is_some());
}

#[test]
fn test_config_file_defaults() {
    let dir = setup_test_repo();
    std::fs::write(
        dir.path().join("git-stamps.toml"),
        "[defaults]\noutput_file = \"stamps/cache.json\"\noutput_to_file = true\nblock = [\"bravo.*\"]\n",
    )
    .unwrap();

    let (code, _, _) = run_cli(dir.path(), &[]);
    assert_eq!(code, 0);
    let saved = read_json(&dir.path().join("stamps").join("cache.json"));
    assert!(saved.get("alpha.txt").is_some());
    assert!(saved.get("bravo.txt").is_none());
}

#[test]
fn test_not_in_git_repo_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "alpha.txt", "alpha");
    let (code, _, stderr) = run_cli(dir.path(), &[]);
    assert_ne!(code, 0);
    assert!(
        stderr.contains("not inside a git repository"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_invalid_hook_exits_nonzero() {
    let dir = setup_test_repo();
    let (code, _, _) = run_cli(dir.path(), &["--hook", "merge"]);
    assert_ne!(code, 0);
}

/// Copy the regular index to a side file, as git does for `git commit -a`.
fn hook_index(dir: &Path) -> (std::path::PathBuf, Vec<u8>) {
    let main_index = dir.join(".git").join("index");
    let alt_index = dir.join(".git").join("index.hook");
    std::fs::copy(&main_index, &alt_index).unwrap();
    (alt_index, std::fs::read(&main_index).unwrap())
}

#[test]
fn test_pre_hook_stages_into_git_index_file() {
    let dir = setup_test_repo();
    let (alt_index, main_before) = hook_index(dir.path());

    let (code, _, stderr) =
        run_cli_with_index(dir.path(), &["--out", "--hook", "pre"], Some(&alt_index));
    assert_eq!(code, 0, "stderr was: {}", stderr);

    let alt = git2::Index::open(&alt_index).unwrap();
    assert!(alt.get_path(Path::new("timestamps.json"), 0).is_some());
    let main_after = std::fs::read(dir.path().join(".git").join("index")).unwrap();
    assert_eq!(main_before, main_after, ".git/index must stay untouched");
}

#[test]
fn test_post_hook_commits_from_git_index_file() {
    let dir = setup_test_repo();
    let (alt_index, main_before) = hook_index(dir.path());

    let (code, _, stderr) =
        run_cli_with_index(dir.path(), &["--out", "--hook", "post"], Some(&alt_index));
    assert_eq!(code, 0, "stderr was: {}", stderr);

    let repo = git2::Repository::open(dir.path()).unwrap();
    assert!(head_message(&repo).starts_with(git_stamps::git::AUTO_COMMIT_MARKER));
    let tree = repo.head().unwrap().peel_to_tree().unwrap();
    assert!(tree.get_path(Path::new("timestamps.json")).is_ok());
    let main_after = std::fs::read(dir.path().join(".git").join("index")).unwrap();
    assert_eq!(main_before, main_after, ".git/index must stay untouched");
}

#[test]
fn test_no_out_overrides_config() {
    let dir = setup_test_repo();
    std::fs::write(
        dir.path().join("git-stamps.toml"),
        "[defaults]\noutput_to_file = true\n",
    )
    .unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["--no-out"]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(v["alpha.txt"]["modified"], 1500);
    assert!(!dir.path().join("timestamps.json").exists());
}
