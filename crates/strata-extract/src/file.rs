//! Single file reader.

use std::fs;
use std::path::Path;

use strata_core::{FileEntry, ScanConfig, TextAnalysis};
use strata_scan::Scanner;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::text::{analyze_text, is_binary};

/// Read one path with its metadata and, for regular files, its content.
///
/// Text content is stored on the entry together with its analysis. Binary
/// content is not stored; the analysis only flags it. Failures to read are
/// recorded on the entry, and a path that cannot be statted yields an
/// error-only entry.
pub fn read_file(path: impl AsRef<Path>) -> Result<FileEntry, ExtractError> {
    let mut config = ScanConfig::new(path.as_ref());
    config.max_depth = Some(0);
    let mut entry = Scanner::new(config).scan()?;

    if !entry.is_file() {
        return Ok(entry);
    }

    match fs::read(&entry.absolute_path) {
        Ok(bytes) if is_binary(&bytes) => {
            debug!(path = %entry.absolute_path.display(), "binary content not stored");
            entry.text_analysis = Some(Box::new(TextAnalysis {
                is_binary: true,
                ..Default::default()
            }));
        }
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes).into_owned();
            entry.text_analysis = Some(Box::new(analyze_text(&content)));
            entry.content = Some(content);
        }
        Err(err) => {
            warn!(path = %entry.absolute_path.display(), error = %err, "cannot read content");
            entry.push_error(format!("failed to read content: {err}"));
        }
    }
    Ok(entry)
}
