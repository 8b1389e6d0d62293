use mediasave_core::{ConflictPolicy, FileType, PersistRequest};
use serde::{Deserialize, Serialize};

/// Flat save request as it arrives from a foreign caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub bytes: Vec<u8>,
    pub base_file_name: String,
    pub extension: String,
    pub mime_type: String,
    #[serde(default)]
    pub sub_collection: Option<String>,
    /// 0 = auto-rename, 1 = overwrite, 2 = fail, 3 = skip; anything else auto-renames.
    #[serde(default)]
    pub conflict_mode: i32,
}

impl SaveRequest {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        base_file_name: impl Into<String>,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            base_file_name: base_file_name.into(),
            extension: extension.into(),
            mime_type: mime_type.into(),
            sub_collection: None,
            conflict_mode: 0,
        }
    }

    pub fn with_sub_collection(mut self, sub_collection: impl Into<String>) -> Self {
        self.sub_collection = Some(sub_collection.into());
        self
    }

    pub fn with_conflict_mode(mut self, conflict_mode: i32) -> Self {
        self.conflict_mode = conflict_mode;
        self
    }
}

impl From<SaveRequest> for PersistRequest {
    fn from(request: SaveRequest) -> Self {
        let file_type = FileType::new(&request.extension, &request.mime_type);
        let persist = PersistRequest::new(request.bytes, request.base_file_name, file_type)
            .with_policy(ConflictPolicy::from_mode(request.conflict_mode));

        match request.sub_collection {
            Some(sub) if !sub.trim().is_empty() => persist.with_sub_collection(sub),
            _ => persist,
        }
    }
}
