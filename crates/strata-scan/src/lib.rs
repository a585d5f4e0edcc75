//! File system scanning for strata.
//!
//! This crate walks a directory tree depth-first and builds a
//! [`FileEntry`] tree, gathering type, owner, symlink and repository
//! metadata along the way.
//!
//! # Overview
//!
//! - **Scanner** keeps directory-listing order and never aborts on a single
//!   child failure; the error is recorded on that entry instead.
//! - **Probe** resolves permission strings, owner/group names and creation
//!   times on a best-effort basis.
//! - **Git detection** finds the enclosing repository and its remotes.
//! - **Progress updates** via broadcast channels.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_scan::{ScanConfig, Scanner};
//!
//! let scanner = Scanner::new(ScanConfig::new("/path/to/scan"));
//! let root = scanner.scan().unwrap();
//!
//! println!("{} children", root.child_count());
//! ```
//!
//! # Progress Monitoring
//!
//! Subscribe to progress updates before scanning:
//!
//! ```rust,no_run
//! use strata_scan::{ScanConfig, Scanner};
//!
//! let scanner = Scanner::new(ScanConfig::new("."));
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         eprintln!("Scanned {} entries", progress.entries_scanned);
//!     }
//! });
//! let _root = scanner.scan();
//! ```

pub mod git;
pub mod probe;
mod progress;
mod scanner;

pub use progress::{PROGRESS_INTERVAL, ScanProgress};
pub use scanner::{Scanner, scan};

// Re-export core types for convenience
pub use strata_core::{EntryKind, FileEntry, GitInfo, ScanConfig, ScanError};
