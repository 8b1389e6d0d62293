//! Storage abstraction trait
//!
//! This module defines the Storage trait that both backends implement, the
//! pending-entry handle they hand out, and the storage error type.

use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use mediasave_core::{PersistError, StorageModel, TargetLocation};
use thiserror::Error;
use tokio::io::AsyncWrite;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create entry: {0}")]
    CreateFailed(String),

    #[error("Failed to write entry: {0}")]
    WriteFailed(String),

    #[error("Failed to finalize entry: {0}")]
    FinalizeFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage full: {0}")]
    StorageFull(String),

    #[error("Failed to find available filename after {0} attempts")]
    NameExhausted(u32),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Classify an I/O failure: permission and out-of-space conditions keep
    /// their own variants, everything else goes through `wrap`.
    pub fn from_io(err: io::Error, wrap: impl FnOnce(String) -> StorageError) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(err.to_string()),
            io::ErrorKind::StorageFull => StorageError::StorageFull(err.to_string()),
            _ => wrap(err.to_string()),
        }
    }
}

impl From<StorageError> for PersistError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PermissionDenied(msg) => {
                PersistError::PermissionDenied(format!("Permission denied: {}", msg))
            }
            StorageError::StorageFull(msg) => {
                PersistError::StorageFull(format!("Insufficient storage space: {}", msg))
            }
            StorageError::IoError(e) => match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    PersistError::PermissionDenied(format!("Permission denied: {}", e))
                }
                io::ErrorKind::StorageFull => {
                    PersistError::StorageFull(format!("Insufficient storage space: {}", e))
                }
                _ => PersistError::FileIo(e.to_string()),
            },
            StorageError::BackendError(msg) | StorageError::ConfigError(msg) => {
                PersistError::Platform(msg)
            }
            other => PersistError::FileIo(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte sink for a pending entry.
pub type EntryWriter = Pin<Box<dyn AsyncWrite + Send + Unpin>>;

/// Handle to an entry created by [`Storage::create_entry`].
///
/// The entry stays pending (invisible under its final name) until
/// [`Storage::finalize`] is called with this handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub id: Uuid,
    /// Backend-relative key: `<relative dir>/<display name>`.
    pub key: String,
    /// Final display name. Scoped backends may have numbered it on insert.
    pub display_name: String,
    /// Stable, opaque URI identifying the entry.
    pub uri: String,
}

/// Storage abstraction trait
///
/// Both backends (scoped registry, path-based directories) implement this
/// trait so the engine can persist into either without knowing which one it
/// talks to. Existence checks, entry creation and finalization are separate
/// calls and are not atomic as a group.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Storage model of this backend; decides which conflict resolver applies.
    fn backend_type(&self) -> StorageModel;

    /// Check whether an entry with `display_name` is already visible at `target`.
    async fn exists(&self, target: &TargetLocation, display_name: &str) -> StorageResult<bool>;

    /// Create a pending entry and open a writer for it.
    ///
    /// Path-based backends write to exactly `display_name` (replacing any
    /// existing entry at finalize). Scoped backends may pick a numbered name
    /// if `display_name` is taken; the chosen name is in the returned handle.
    async fn create_entry(
        &self,
        target: &TargetLocation,
        display_name: &str,
        mime_type: &str,
    ) -> StorageResult<(PendingEntry, EntryWriter)>;

    /// Mark a pending entry complete and visible.
    async fn finalize(&self, entry: &PendingEntry) -> StorageResult<()>;

    /// Remove an entry that was never finalized.
    async fn delete(&self, entry: &PendingEntry) -> StorageResult<()>;

    /// Human-readable filesystem path of an entry, when the backend can tell.
    async fn resolve_path(&self, entry: &PendingEntry) -> StorageResult<String>;
}
