use bytes::Bytes;

use super::{ConflictPolicy, FileType};

/// A single persist call, already typed.
///
/// `bytes` is reference-counted so the boundary can hand over its buffer
/// without copying it again.
#[derive(Debug, Clone)]
pub struct PersistRequest {
    pub bytes: Bytes,
    pub base_name: String,
    pub file_type: FileType,
    pub sub_collection: Option<String>,
    pub policy: ConflictPolicy,
}

impl PersistRequest {
    pub fn new(bytes: impl Into<Bytes>, base_name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            bytes: bytes.into(),
            base_name: base_name.into(),
            file_type,
            sub_collection: None,
            policy: ConflictPolicy::default(),
        }
    }

    pub fn with_sub_collection(mut self, sub_collection: impl Into<String>) -> Self {
        self.sub_collection = Some(sub_collection.into());
        self
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `base.ext`, or the bare base name when the extension is empty.
    pub fn display_name(&self) -> String {
        compose_file_name(&self.base_name, self.file_type.extension())
    }
}

/// Join a base name and an extension the way every backend expects.
///
/// `("video.backup", "mp4")` becomes `video.backup.mp4`; an empty extension
/// leaves the base name untouched.
pub fn compose_file_name(base_name: &str, extension: &str) -> String {
    let extension = extension.trim().trim_start_matches('.');
    if extension.is_empty() {
        base_name.to_string()
    } else {
        format!("{}.{}", base_name, extension)
    }
}
