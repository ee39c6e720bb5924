//! Shared fixtures: throwaway repositories with commits at fixed times.

#![allow(dead_code)]

use git2::{Repository, Signature, Time};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

pub fn init_repo(root: &Path) -> Repository {
    let repo = Repository::init(root).expect("git init");
    let mut config = repo.config().expect("repo config");
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    repo
}

pub fn write_file(root: &Path, name: &str, body: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}

/// Stage `names` and commit them with author and committer time `secs`.
pub fn commit_at(repo: &Repository, names: &[&str], secs: i64, message: &str) {
    let mut index = repo.index().unwrap();
    // The pipeline writes the index through its own handle.
    index.read(false).unwrap();
    for name in names {
        index.add_path(Path::new(name)).unwrap();
    }
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new("Test User", "test@example.com", &Time::new(secs, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

pub fn set_mtime(path: &Path, secs: u64) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

pub fn head_message(repo: &Repository) -> String {
    repo.head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .message()
        .unwrap_or("")
        .to_string()
}
