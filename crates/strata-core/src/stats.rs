//! Summary statistics for a scanned tree.

use serde::{Deserialize, Serialize};

use crate::entry::{EntryKind, FileEntry};

/// Counts gathered from a finished tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStats {
    /// Total size of regular files in bytes.
    pub total_bytes: u64,
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
    pub others: u64,
    /// Entries carrying an error.
    pub errors: u64,
    /// Maximum depth reached; the root is at depth 0.
    pub max_depth: u32,
}

impl EntryStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect stats over a whole tree.
    pub fn from_entry(root: &FileEntry) -> Self {
        let mut stats = Self::new();
        stats.walk(root, 0);
        stats
    }

    fn walk(&mut self, entry: &FileEntry, depth: u32) {
        self.record(entry, depth);
        for child in &entry.children {
            self.walk(child, depth + 1);
        }
    }

    /// Update stats with a single entry.
    pub fn record(&mut self, entry: &FileEntry, depth: u32) {
        match entry.kind {
            EntryKind::File { .. } => {
                self.files += 1;
                self.total_bytes += entry.size;
            }
            EntryKind::Directory { .. } => self.dirs += 1,
            EntryKind::Symlink { .. } => self.symlinks += 1,
            EntryKind::Other => self.others += 1,
        }
        if entry.has_error() {
            self.errors += 1;
        }
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total number of entries.
    pub fn total(&self) -> u64 {
        self.files + self.dirs + self.symlinks + self.others
    }
}
