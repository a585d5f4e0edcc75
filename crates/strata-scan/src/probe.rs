//! Platform-specific metadata lookups.
//!
//! Everything here is best-effort: values the platform cannot provide come
//! back empty rather than as errors.

use std::fs::Metadata;
use std::time::SystemTime;

/// ls-style permission string, e.g. `drwxr-xr-x`.
#[cfg(unix)]
pub fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_fifo() {
        'p'
    } else if file_type.is_socket() {
        's'
    } else if file_type.is_char_device() {
        'c'
    } else if file_type.is_block_device() {
        'b'
    } else {
        '-'
    };

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(kind);
    // (read bit, write bit, exec bit, special bit, special char)
    let triples = [
        (0o400, 0o200, 0o100, 0o4000, 's'),
        (0o040, 0o020, 0o010, 0o2000, 's'),
        (0o004, 0o002, 0o001, 0o1000, 't'),
    ];
    for (r, w, x, special, special_char) in triples {
        out.push(if mode & r != 0 { 'r' } else { '-' });
        out.push(if mode & w != 0 { 'w' } else { '-' });
        out.push(match (mode & x != 0, mode & special != 0) {
            (true, true) => special_char,
            (false, true) => special_char.to_ascii_uppercase(),
            (true, false) => 'x',
            (false, false) => '-',
        });
    }
    out
}

#[cfg(not(unix))]
pub fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'l'
    } else {
        '-'
    };
    let perms = if metadata.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    format!("{kind}{perms}")
}

/// Owner and group names for the entry.
#[cfg(unix)]
pub fn owner_and_group(metadata: &Metadata) -> (String, String) {
    use std::os::unix::fs::MetadataExt;

    let owner = uzers::get_user_by_uid(metadata.uid())
        .map(|user| user.name().to_string_lossy().into_owned())
        .unwrap_or_default();
    let group = uzers::get_group_by_gid(metadata.gid())
        .map(|group| group.name().to_string_lossy().into_owned())
        .unwrap_or_default();
    (owner, group)
}

#[cfg(not(unix))]
pub fn owner_and_group(_metadata: &Metadata) -> (String, String) {
    (String::new(), String::new())
}

/// Creation time, where the platform and filesystem record one.
pub fn created(metadata: &Metadata) -> Option<SystemTime> {
    metadata.created().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn test_mode_string_unix() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "x").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(mode_string(&fs::symlink_metadata(&file).unwrap()), "-rw-r--r--");

        fs::set_permissions(&file, fs::Permissions::from_mode(0o4755)).unwrap();
        assert_eq!(mode_string(&fs::symlink_metadata(&file).unwrap()), "-rwsr-xr-x");

        let dir = temp.path().join("d");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o1777)).unwrap();
        assert_eq!(mode_string(&fs::symlink_metadata(&dir).unwrap()), "drwxrwxrwt");

        let link = temp.path().join("l");
        std::os::unix::fs::symlink(&file, &link).unwrap();
        assert!(mode_string(&fs::symlink_metadata(&link).unwrap()).starts_with('l'));
    }

    #[test]
    #[cfg(unix)]
    fn test_owner_of_own_file() {
        use std::os::unix::fs::MetadataExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "x").unwrap();
        let metadata = fs::metadata(&file).unwrap();

        let (owner, _group) = owner_and_group(&metadata);
        let expected = uzers::get_user_by_uid(metadata.uid())
            .map(|u| u.name().to_string_lossy().into_owned())
            .unwrap_or_default();
        assert_eq!(owner, expected);
    }

    #[test]
    fn test_created_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let metadata = fs::metadata(temp.path()).unwrap();
        let _ = created(&metadata);
    }
}
