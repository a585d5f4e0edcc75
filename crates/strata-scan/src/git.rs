//! Git repository detection.
//!
//! Detection never fails: any lookup or parse problem degrades to "not a
//! repository" or "no remotes".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use strata_core::GitInfo;
use tracing::debug;

/// Walk upward from `path` looking for a `.git` directory.
///
/// Starts from the parent when `path` is a file.
pub fn find_git_dir(path: &Path) -> Option<PathBuf> {
    let start = if path.is_file() { path.parent()? } else { path };
    start
        .ancestors()
        .map(|dir| dir.join(".git"))
        .find(|candidate| candidate.is_dir())
}

/// Check if `path` is inside a repository.
pub fn is_repo(path: &Path) -> bool {
    find_git_dir(path).is_some()
}

/// Remotes configured for the repository containing `path`.
pub fn remotes_of(path: &Path) -> BTreeMap<String, String> {
    find_git_dir(path)
        .map(|git_dir| remotes_in(&git_dir))
        .unwrap_or_default()
}

fn remotes_in(git_dir: &Path) -> BTreeMap<String, String> {
    match fs::read_to_string(git_dir.join("config")) {
        Ok(config) => parse_remotes(&config),
        Err(err) => {
            debug!(git_dir = %git_dir.display(), error = %err, "unreadable git config");
            BTreeMap::new()
        }
    }
}

/// Extract `[remote "name"]` URLs from git config text.
///
/// The first `url` after a remote header wins; any other section header
/// closes the current remote.
pub fn parse_remotes(config: &str) -> BTreeMap<String, String> {
    let mut remotes = BTreeMap::new();
    let mut current: Option<&str> = None;

    for line in config.lines().map(str::trim) {
        if line.starts_with('[') {
            current = line
                .strip_prefix("[remote \"")
                .and_then(|rest| rest.strip_suffix("\"]"));
            continue;
        }
        let Some(name) = current else { continue };
        match line.split_once('=') {
            Some((key, value)) if key.trim() == "url" => {
                remotes.insert(name.to_string(), value.trim().to_string());
                current = None;
            }
            _ => {}
        }
    }
    remotes
}

/// Name of the checked-out branch, if any.
#[cfg(feature = "git")]
pub fn current_branch(path: &Path) -> Option<String> {
    let repo = git2::Repository::discover(path).ok()?;
    let head = repo.head().ok()?;
    head.shorthand().map(str::to_string)
}

#[cfg(not(feature = "git"))]
pub fn current_branch(_path: &Path) -> Option<String> {
    None
}

/// Full repository info for a directory.
pub fn detect(path: &Path) -> GitInfo {
    let Some(git_dir) = find_git_dir(path) else {
        return GitInfo::none();
    };

    let info = GitInfo {
        is_repo: true,
        remotes: remotes_in(&git_dir),
        branch: current_branch(path),
    };
    debug!(
        path = %path.display(),
        remotes = info.remotes.len(),
        branch = info.branch.as_deref().unwrap_or(""),
        "git repository detected"
    );
    info
}
