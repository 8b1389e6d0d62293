use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ErrorMetadata, PersistError};

/// Outcome of one persist call. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PersistResult {
    Success { path: String, uri: String },
    Failure { code: ErrorCode, message: String },
}

impl PersistResult {
    pub fn success(path: impl Into<String>, uri: impl Into<String>) -> Self {
        PersistResult::Success {
            path: path.into(),
            uri: uri.into(),
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        PersistResult::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PersistResult::Success { .. })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            PersistResult::Success { .. } => None,
            PersistResult::Failure { code, .. } => Some(*code),
        }
    }
}

impl From<PersistError> for PersistResult {
    fn from(err: PersistError) -> Self {
        PersistResult::failure(err.error_code(), err.to_string())
    }
}

impl From<Result<(String, String), PersistError>> for PersistResult {
    fn from(result: Result<(String, String), PersistError>) -> Self {
        match result {
            Ok((path, uri)) => PersistResult::success(path, uri),
            Err(err) => err.into(),
        }
    }
}
