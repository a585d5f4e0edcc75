//! Recursive depth-first directory scanner.

use std::fs::{self, FileType, Metadata};
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use strata_core::{EntryKind, FileEntry, GitInfo, ScanConfig, ScanError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::progress::{ProgressTracker, ScanProgress};
use crate::{git, probe};

/// Scan `path` with the default configuration.
pub fn scan(path: impl AsRef<Path>) -> Result<FileEntry, ScanError> {
    Scanner::new(ScanConfig::new(path.as_ref())).scan()
}

/// Sequential scanner producing a [`FileEntry`] tree.
///
/// Children keep directory-listing order. Failures below the root never
/// abort the walk: they are recorded on the affected entry instead.
pub struct Scanner {
    config: ScanConfig,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new(config: ScanConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the configured root.
    ///
    /// Fails only when the configuration is invalid or the root cannot be
    /// resolved to an absolute path.
    pub fn scan(&self) -> Result<FileEntry, ScanError> {
        let ignore = self.config.ignore_set()?;
        let logical = self.config.root.clone();
        let absolute = std::path::absolute(&logical).map_err(|source| ScanError::Unresolvable {
            path: logical.clone(),
            source,
        })?;

        let name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| logical.to_string_lossy().into_owned());

        let mut walk = Walk {
            config: &self.config,
            ignore,
            tracker: ProgressTracker::new(),
            progress_tx: &self.progress_tx,
        };
        let root = walk.visit(name.into(), logical, absolute, 0, None);

        let progress = walk.tracker.snapshot();
        debug!(
            entries = progress.entries_scanned,
            dirs = progress.dirs_scanned,
            errors = progress.errors_count,
            elapsed_ms = progress.elapsed.as_millis() as u64,
            "scan complete"
        );
        let _ = self.progress_tx.send(progress);

        Ok(root)
    }
}

/// State of a single scan call.
struct Walk<'a> {
    config: &'a ScanConfig,
    ignore: globset::GlobSet,
    tracker: ProgressTracker,
    progress_tx: &'a broadcast::Sender<ScanProgress>,
}

impl Walk<'_> {
    /// Build the entry for one path, recursing into directories.
    ///
    /// `hint` is the type reported by the parent's listing, used to classify
    /// the entry when lstat itself fails.
    fn visit(
        &mut self,
        name: CompactString,
        logical: PathBuf,
        absolute: PathBuf,
        depth: u32,
        hint: Option<FileType>,
    ) -> FileEntry {
        if self.tracker.record_entry(&absolute) {
            let _ = self.progress_tx.send(self.tracker.snapshot());
        }

        let metadata = match fs::symlink_metadata(&absolute) {
            Ok(metadata) => metadata,
            Err(err) => {
                let err = ScanError::io(&absolute, err);
                warn!(error = %err, "cannot stat entry");
                self.tracker.record_error();
                let kind = hint.map_or(EntryKind::Other, |ft| kind_of(ft, &name));
                return FileEntry::error_stub(name, logical, absolute, kind, err.to_string());
            }
        };

        let mut entry = FileEntry::new(name, logical, absolute, EntryKind::Other);
        self.fill_metadata(&mut entry, &metadata);

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            let target = match fs::read_link(&entry.absolute_path) {
                Ok(target) => CompactString::from(target.to_string_lossy()),
                Err(err) => {
                    warn!(path = %entry.absolute_path.display(), error = %err, "cannot read symlink");
                    self.tracker.record_error();
                    entry.push_error(format!("failed to read symlink target: {err}"));
                    CompactString::default()
                }
            };
            entry.kind = EntryKind::Symlink { target };
        } else if file_type.is_dir() {
            self.tracker.record_dir();
            entry.size = 0;
            let git = if self.config.detect_git {
                git::detect(&entry.absolute_path)
            } else {
                GitInfo::none()
            };
            entry.kind = EntryKind::Directory { git };
            if self.config.may_descend(depth) {
                self.list(&mut entry, depth);
            }
        } else {
            entry.kind = kind_of(file_type, &entry.name);
        }

        entry
    }

    fn fill_metadata(&self, entry: &mut FileEntry, metadata: &Metadata) {
        entry.size = metadata.len();
        entry.mode = probe::mode_string(metadata).into();
        entry.modified = metadata.modified().ok();
        entry.created = probe::created(metadata);
        if self.config.resolve_owners {
            let (owner, group) = probe::owner_and_group(metadata);
            entry.owner = owner.into();
            entry.group = group.into();
        }
    }

    /// Append the children of `dir` in listing order.
    fn list(&mut self, dir: &mut FileEntry, depth: u32) {
        debug!(path = %dir.absolute_path.display(), depth, "reading directory");

        let listing = match fs::read_dir(&dir.absolute_path) {
            Ok(listing) => listing,
            Err(err) => {
                let err = ScanError::io(&dir.absolute_path, err);
                warn!(error = %err, "cannot read directory");
                self.tracker.record_error();
                dir.push_error(format!("failed to read directory: {err}"));
                return;
            }
        };

        for item in listing {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    let err = ScanError::io(&dir.absolute_path, err);
                    warn!(error = %err, "cannot read directory entry");
                    self.tracker.record_error();
                    dir.push_error(format!("failed to read directory entry: {err}"));
                    continue;
                }
            };

            let file_name = item.file_name();
            let name = CompactString::from(file_name.to_string_lossy());
            if self.config.should_skip_hidden(&name) || self.ignore.is_match(name.as_str()) {
                continue;
            }

            let child = self.visit(
                name,
                dir.path.join(&file_name),
                item.path(),
                depth + 1,
                item.file_type().ok(),
            );
            dir.children.push(child);
        }
    }
}

fn kind_of(file_type: FileType, name: &str) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::directory()
    } else if file_type.is_symlink() {
        EntryKind::Symlink {
            target: CompactString::default(),
        }
    } else if file_type.is_file() {
        EntryKind::file(name)
    } else {
        EntryKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.TXT"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();
        fs::write(root.join(".hidden"), "secret").unwrap();

        temp
    }

    fn names(entry: &FileEntry) -> Vec<&str> {
        entry.children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let root = scan(temp.path()).unwrap();

        assert!(root.is_dir());
        assert_eq!(root.child_count(), 4);
        assert_eq!(root.size, 0);
        assert!(root.error.is_none());

        let dir1 = root.child("dir1").unwrap();
        let file2 = dir1.child("file2.TXT").unwrap();
        assert_eq!(file2.extension(), Some("txt"));
        assert_eq!(file2.size, 17);
        assert_eq!(file2.path, temp.path().join("dir1/file2.TXT"));
        assert_eq!(file2.mode.len(), 10);
        assert!(file2.modified.is_some());
    }

    #[test]
    fn test_children_keep_listing_order() {
        let temp = create_test_tree();
        let root = scan(temp.path()).unwrap();

        let on_disk: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names(&root), on_disk);
    }

    #[test]
    fn test_hidden_entries_skipped_except_git() {
        let temp = create_test_tree();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let mut config = ScanConfig::new(temp.path());
        config.include_hidden = false;
        let root = Scanner::new(config).scan().unwrap();

        assert!(root.child(".hidden").is_none());
        assert!(root.child(".git").is_some());
        assert!(root.git().unwrap().is_repo);
    }

    #[test]
    fn test_ignore_patterns() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["dir2".to_string(), "*.txt".to_string()])
            .build()
            .unwrap();

        let root = Scanner::new(config).scan().unwrap();
        assert!(root.child("dir2").is_none());
        assert!(root.child("file1.txt").is_none());
        assert!(root.child("dir1").unwrap().child("file2.TXT").is_some());
    }

    #[test]
    fn test_max_depth_reports_but_does_not_list() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .max_depth(Some(1))
            .build()
            .unwrap();

        let root = Scanner::new(config).scan().unwrap();
        let dir1 = root.child("dir1").unwrap();
        assert!(dir1.is_dir());
        assert_eq!(dir1.child_count(), 0);
    }

    #[test]
    fn test_missing_root_is_error_entry() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let root = scan(&missing).unwrap();
        assert!(root.error.is_some());
        assert_eq!(root.child_count(), 0);
        assert_eq!(root.name, "nope");
        assert!(matches!(root.kind, EntryKind::Other));
    }

    #[test]
    fn test_empty_root_is_unresolvable() {
        let err = scan("").unwrap_err();
        assert!(matches!(err, ScanError::Unresolvable { .. }));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let temp = create_test_tree();
        let mut config = ScanConfig::new(temp.path());
        config.ignore_patterns.push("[".to_string());
        assert!(matches!(
            Scanner::new(config).scan(),
            Err(ScanError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_final_progress_is_published() {
        let temp = create_test_tree();
        let scanner = Scanner::new(ScanConfig::new(temp.path()));
        let mut rx = scanner.subscribe();

        scanner.scan().unwrap();
        let progress = rx.try_recv().unwrap();
        // root, 3 dirs, 4 files, .hidden
        assert_eq!(progress.entries_scanned, 9);
        assert_eq!(progress.dirs_scanned, 4);
        assert_eq!(progress.errors_count, 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinks_are_not_followed() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink("dir1", temp.path().join("link")).unwrap();
        std::os::unix::fs::symlink("missing", temp.path().join("broken")).unwrap();

        let root = scan(temp.path()).unwrap();
        let link = root.child("link").unwrap();
        assert!(link.is_symlink());
        assert_eq!(link.symlink_target(), Some("dir1"));
        assert_eq!(link.child_count(), 0);
        assert!(link.mode.starts_with('l'));

        let broken = root.child("broken").unwrap();
        assert_eq!(broken.symlink_target(), Some("missing"));
        assert!(broken.error.is_none());
    }
}
