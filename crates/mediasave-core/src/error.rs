//! Error types module
//!
//! Every failure a persist call can report is one of the seven codes in
//! [`ErrorCode`]. Storage backends and the engine raise [`PersistError`],
//! which always collapses to exactly one code plus a human-readable message
//! before it crosses the call boundary.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for user-actionable issues like a declined conflict
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Flat error taxonomy shared by both storage backends and all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidFile,
    PermissionDenied,
    UnsupportedFormat,
    StorageFull,
    FileExists,
    FileIoError,
    PlatformError,
}

impl ErrorCode {
    /// Wire representation used at the call boundary (e.g. `"FILE_EXISTS"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFile => "INVALID_FILE",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorCode::StorageFull => "STORAGE_FULL",
            ErrorCode::FileExists => "FILE_EXISTS",
            ErrorCode::FileIoError => "FILE_IO_ERROR",
            ErrorCode::PlatformError => "PLATFORM_ERROR",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Metadata describing how an error should be reported.
pub trait ErrorMetadata {
    /// Machine-readable error code
    fn error_code(&self) -> ErrorCode;

    /// Whether the user can act on this failure (grant access, pick another
    /// format, choose another name). Such failures are never retried here.
    fn is_user_actionable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Unsupported format: {format} - {reason}")]
    UnsupportedFormat { format: String, reason: String },

    #[error("{0}")]
    StorageFull(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("{0}")]
    FileIo(String),

    #[error("{0}")]
    Platform(String),
}

impl PersistError {
    /// Build an `UnsupportedFormat` error; the format is reported upper-cased.
    pub fn unsupported(extension: &str, reason: impl Into<String>) -> Self {
        PersistError::UnsupportedFormat {
            format: extension.to_uppercase(),
            reason: reason.into(),
        }
    }
}

impl ErrorMetadata for PersistError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PersistError::InvalidFile(_) => ErrorCode::InvalidFile,
            PersistError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            PersistError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            PersistError::StorageFull(_) => ErrorCode::StorageFull,
            PersistError::FileExists(_) => ErrorCode::FileExists,
            PersistError::FileIo(_) => ErrorCode::FileIoError,
            PersistError::Platform(_) => ErrorCode::PlatformError,
        }
    }

    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PersistError::InvalidFile(_)
                | PersistError::PermissionDenied(_)
                | PersistError::UnsupportedFormat { .. }
                | PersistError::StorageFull(_)
                | PersistError::FileExists(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PersistError::InvalidFile(_) | PersistError::UnsupportedFormat { .. } => {
                LogLevel::Debug
            }
            PersistError::PermissionDenied(_)
            | PersistError::FileExists(_)
            | PersistError::StorageFull(_) => LogLevel::Warn,
            PersistError::FileIo(_) | PersistError::Platform(_) => LogLevel::Error,
        }
    }
}
