//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Entries between two published progress updates.
pub const PROGRESS_INTERVAL: u64 = 256;

/// Progress information during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Number of entries (of any kind) visited so far.
    pub entries_scanned: u64,
    /// Number of directories visited so far.
    pub dirs_scanned: u64,
    /// Number of entry-level errors absorbed so far.
    pub errors_count: u64,
    /// Most recently visited path.
    pub current_path: PathBuf,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate scan rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.entries_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    entries_scanned: u64,
    dirs_scanned: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            entries_scanned: 0,
            dirs_scanned: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    /// Count an entry; returns true when an update is due.
    pub fn record_entry(&mut self, path: &Path) -> bool {
        self.entries_scanned += 1;
        self.current_path = path.to_path_buf();
        self.entries_scanned % PROGRESS_INTERVAL == 0
    }

    pub fn record_dir(&mut self) {
        self.dirs_scanned += 1;
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            entries_scanned: self.entries_scanned,
            dirs_scanned: self.dirs_scanned,
            errors_count: self.errors_count,
            current_path: self.current_path.clone(),
            elapsed: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_due_every_interval() {
        let mut tracker = ProgressTracker::new();
        let due = (0..PROGRESS_INTERVAL * 2)
            .filter(|_| tracker.record_entry(Path::new("x")))
            .count();
        assert_eq!(due, 2);

        tracker.record_dir();
        tracker.record_error();
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.entries_scanned, PROGRESS_INTERVAL * 2);
        assert_eq!(snapshot.dirs_scanned, 1);
        assert_eq!(snapshot.errors_count, 1);
        assert_eq!(snapshot.current_path, PathBuf::from("x"));
    }

    #[test]
    fn test_rate_without_elapsed_time() {
        assert_eq!(ScanProgress::default().entries_per_second(), 0.0);
    }
}
