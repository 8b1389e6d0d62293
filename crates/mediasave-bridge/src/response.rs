use mediasave_core::{ErrorCode, PersistResult};
use serde::{Deserialize, Serialize};

/// Flat save response handed back across the boundary.
///
/// Either `file_path` and `uri` are set (success) or `error_code` and
/// `error_message` are, never a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub file_path: Option<String>,
    pub uri: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl SaveResponse {
    pub fn success(file_path: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            success: true,
            file_path: Some(file_path.into()),
            uri: Some(uri.into()),
            error_code: None,
            error_message: None,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            file_path: None,
            uri: None,
            error_code: Some(code.as_str().to_string()),
            error_message: Some(message.into()),
        }
    }
}

impl From<PersistResult> for SaveResponse {
    fn from(result: PersistResult) -> Self {
        match result {
            PersistResult::Success { path, uri } => SaveResponse::success(path, uri),
            PersistResult::Failure { code, message } => SaveResponse::failure(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let response: SaveResponse =
            PersistResult::success("/data/Pictures/photo.jpg", "file:///data/Pictures/photo.jpg")
                .into();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "filePath": "/data/Pictures/photo.jpg",
                "uri": "file:///data/Pictures/photo.jpg",
                "errorCode": null,
                "errorMessage": null
            })
        );
    }

    #[test]
    fn test_failure_carries_wire_code() {
        let response: SaveResponse =
            PersistResult::failure(ErrorCode::FileExists, "File already exists: photo.jpg").into();

        assert!(!response.success);
        assert!(response.file_path.is_none());
        assert!(response.uri.is_none());
        assert_eq!(response.error_code.as_deref(), Some("FILE_EXISTS"));
        assert_eq!(
            response.error_message.as_deref(),
            Some("File already exists: photo.jpg")
        );
    }
}
