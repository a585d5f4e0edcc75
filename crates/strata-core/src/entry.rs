//! File and directory entry types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::text::TextAnalysis;

/// Repository state of a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    /// Whether the directory or one of its ancestors holds a `.git` directory.
    pub is_repo: bool,
    /// Configured remotes, name to URL.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remotes: BTreeMap<String, String>,
    /// Checked-out branch, when it could be determined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl GitInfo {
    /// Info for a path outside of any repository.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Type of file system entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(tag = "type", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Lower-cased extension without the leading dot.
        extension: Option<CompactString>,
    },
    /// Directory.
    Directory {
        /// Repository metadata for this directory.
        git: GitInfo,
    },
    /// Symbolic link.
    Symlink {
        /// Link target as stored in the link; empty if unreadable.
        target: CompactString,
    },
    /// Other file types (sockets, devices, fifos) or unknown.
    Other,
}

impl EntryKind {
    /// A file kind with the extension derived from `name`.
    pub fn file(name: &str) -> Self {
        EntryKind::File {
            extension: extension_of(name),
        }
    }

    /// A directory kind with no repository info.
    pub fn directory() -> Self {
        EntryKind::Directory {
            git: GitInfo::none(),
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink { .. })
    }

    /// Lower-case kind name: `file`, `directory`, `symlink` or `other`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Lower-cased extension of a file name, without the dot.
///
/// Names whose only dot is the leading one (`.bashrc`) have no extension.
pub fn extension_of(name: &str) -> Option<CompactString> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(CompactString::from(ext.to_lowercase()))
}

/// A single filesystem object in a scanned tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Path relative to how the scan root was given.
    pub path: PathBuf,

    /// Absolute path on disk.
    pub absolute_path: PathBuf,

    /// Entry type and kind-specific metadata.
    pub kind: EntryKind,

    /// Size in bytes as reported by lstat.
    pub size: u64,

    /// Permission string, e.g. `-rw-r--r--`.
    pub mode: CompactString,

    /// Owner name; empty if unresolvable.
    pub owner: CompactString,

    /// Group name; empty if unresolvable.
    pub group: CompactString,

    /// Last modification time.
    pub modified: Option<SystemTime>,

    /// Creation time where the platform reports one.
    pub created: Option<SystemTime>,

    /// Non-fatal failure encountered while reading this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// File content, when read by the file reader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Text analysis of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_analysis: Option<Box<TextAnalysis>>,

    /// Children in directory-listing order (directories only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileEntry>,
}

impl FileEntry {
    /// Create an entry with empty metadata.
    pub fn new(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        absolute_path: impl Into<PathBuf>,
        kind: EntryKind,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            absolute_path: absolute_path.into(),
            kind,
            size: 0,
            mode: CompactString::default(),
            owner: CompactString::default(),
            group: CompactString::default(),
            modified: None,
            created: None,
            error: None,
            content: None,
            text_analysis: None,
            children: Vec::new(),
        }
    }

    /// Create a stub carrying only identity and an error.
    pub fn error_stub(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        absolute_path: impl Into<PathBuf>,
        kind: EntryKind,
        error: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(name, path, absolute_path, kind);
        entry.error = Some(error.into());
        entry
    }

    /// Record a non-fatal error, appending to any existing one.
    pub fn push_error(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        match &mut self.error {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(message);
            }
            None => self.error = Some(message.to_string()),
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this entry is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Check if an error was recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// File extension, if this is a file that has one.
    pub fn extension(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { extension } => extension.as_deref(),
            _ => None,
        }
    }

    /// Symlink target, if this is a symlink.
    pub fn symlink_target(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Symlink { target } => Some(target),
            _ => None,
        }
    }

    /// Repository info, if this is a directory.
    pub fn git(&self) -> Option<&GitInfo> {
        match &self.kind {
            EntryKind::Directory { git } => Some(git),
            _ => None,
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FileEntry> {
        self.children.iter().find(|c| c.name == name)
    }
}
