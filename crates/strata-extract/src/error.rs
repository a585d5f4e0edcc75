//! Error types for extractors.

use std::path::PathBuf;

use strata_core::ScanError;
use thiserror::Error;

/// Errors that can occur while extracting.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading the source failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text analysis was requested for binary content.
    #[error("Binary content, cannot analyze as text: {path}")]
    Binary { path: PathBuf },

    /// Stat or path resolution failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl ExtractError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
