//! Shared naming helpers for storage backends.
//!
//! Keys have the form `<relative dir>/<display name>`, e.g.
//! `Pictures/MyAlbum/photo.jpg`. Pending files sit next to their final
//! location as `.pending-<id>-<display name>`.

use std::path::{Component, Path, PathBuf};

use mediasave_core::constants::PENDING_PREFIX;
use mediasave_core::{compose_file_name, TargetLocation};
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Storage key of `display_name` inside `target`.
pub fn entry_key(target: &TargetLocation, display_name: &str) -> String {
    format!("{}/{}", target.relative_dir(), display_name)
}

/// On-disk name of an entry that has not been finalized yet.
pub fn pending_file_name(id: Uuid, display_name: &str) -> String {
    format!("{}{}-{}", PENDING_PREFIX, id.simple(), display_name)
}

/// `base (n).ext`, or `base (n)` without an extension.
pub fn numbered_name(base_name: &str, extension: &str, n: u32) -> String {
    compose_file_name(&format!("{} ({})", base_name, n), extension)
}

/// Split a display name into (base, extension) at the last dot.
///
/// Dot-files (`.profile`) and names without a dot have no extension.
pub fn split_display_name(display_name: &str) -> (&str, &str) {
    match display_name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, ext),
        _ => (display_name, ""),
    }
}

/// Relative path with exactly one trailing slash, as stored in the registry.
pub fn normalize_relative_path(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}

/// Reject display names that would escape their directory or collide with
/// pending files.
pub fn validate_display_name(display_name: &str) -> StorageResult<()> {
    if display_name.is_empty()
        || display_name.contains('/')
        || display_name.contains('\\')
        || display_name == "."
        || display_name == ".."
        || display_name.starts_with(PENDING_PREFIX)
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid display name: {:?}",
            display_name
        )));
    }
    Ok(())
}

/// Resolve a key below `base_path`, refusing anything that is not a plain
/// relative path.
pub fn key_to_path(base_path: &Path, key: &str) -> StorageResult<PathBuf> {
    if key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    let relative = Path::new(key);
    if relative.as_os_str().is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(StorageError::InvalidKey(format!(
            "Storage key is not a plain relative path: {}",
            key
        )));
    }

    Ok(base_path.join(relative))
}

/// `file://` URI for an absolute path, percent-encoding each segment.
pub fn file_uri(path: &Path) -> String {
    let encoded = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(urlencoding::encode(&part.to_string_lossy()).into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    format!("file:///{}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasave_core::{FileCategory, StorageModel};

    #[test]
    fn test_entry_key() {
        let target =
            TargetLocation::new(FileCategory::Image, Some("Album"), StorageModel::Scoped).unwrap();
        assert_eq!(entry_key(&target, "photo.jpg"), "Pictures/Album/photo.jpg");
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("photo", "jpg", 1), "photo (1).jpg");
        assert_eq!(numbered_name("notes", "", 3), "notes (3)");
    }

    #[test]
    fn test_split_display_name() {
        assert_eq!(split_display_name("photo.jpg"), ("photo", "jpg"));
        assert_eq!(split_display_name("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_display_name("README"), ("README", ""));
        assert_eq!(split_display_name(".profile"), (".profile", ""));
    }

    #[test]
    fn test_normalize_relative_path() {
        assert_eq!(normalize_relative_path("Pictures/Album"), "Pictures/Album/");
        assert_eq!(normalize_relative_path("Pictures/"), "Pictures/");
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("photo.jpg").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("a/b.jpg").is_err());
        assert!(validate_display_name("..").is_err());
        assert!(validate_display_name(".pending-abc-photo.jpg").is_err());
    }

    #[test]
    fn test_key_to_path_rejects_traversal() {
        let base = Path::new("/data");
        assert!(key_to_path(base, "../etc/passwd").is_err());
        assert!(key_to_path(base, "/etc/passwd").is_err());
        assert_eq!(
            key_to_path(base, "Pictures/photo.jpg").unwrap(),
            PathBuf::from("/data/Pictures/photo.jpg")
        );
    }

    #[test]
    fn test_file_uri_encodes_segments() {
        let uri = file_uri(Path::new("/data/Pictures/my photo (1).jpg"));
        assert_eq!(uri, "file:///data/Pictures/my%20photo%20%281%29.jpg");
    }

    #[test]
    fn test_pending_file_name() {
        let id = Uuid::nil();
        assert_eq!(
            pending_file_name(id, "photo.jpg"),
            ".pending-00000000000000000000000000000000-photo.jpg"
        );
    }
}
