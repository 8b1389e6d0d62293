use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mediasave_core::{StorageModel, TargetLocation};
use tokio::fs;

use crate::keys::{entry_key, file_uri, key_to_path, pending_file_name, validate_display_name};
use crate::traits::{EntryWriter, PendingEntry, Storage, StorageError, StorageResult};

/// Path-based storage implementation
///
/// Collections are plain directories below `base_path`
/// (`Pictures/`, `Movies/`, `Music/`, `Download/`). Existence checks look at
/// the final file name; writes go to a hidden pending file that `finalize`
/// renames over the final name, replacing any previous file.
#[derive(Clone, Debug)]
pub struct PathBasedStorage {
    base_path: PathBuf,
}

impl PathBasedStorage {
    /// Create a new PathBasedStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding the public collections
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(PathBasedStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn final_path(&self, entry: &PendingEntry) -> StorageResult<PathBuf> {
        key_to_path(&self.base_path, &entry.key)
    }

    fn pending_path(&self, entry: &PendingEntry) -> StorageResult<PathBuf> {
        let final_path = self.final_path(entry)?;
        let parent = final_path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey(entry.key.clone()))?;
        Ok(parent.join(pending_file_name(entry.id, &entry.display_name)))
    }

    /// Ensure directory exists, refusing paths that exist as regular files.
    async fn ensure_dir(&self, dir: &Path) -> StorageResult<()> {
        match fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::CreateFailed(format!(
                "Path exists but is not a directory: {}",
                dir.display()
            ))),
            Err(_) => fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::from_io(e, |msg| {
                    StorageError::CreateFailed(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        msg
                    ))
                })
            }),
        }
    }
}

#[async_trait]
impl Storage for PathBasedStorage {
    fn backend_type(&self) -> StorageModel {
        StorageModel::PathBased
    }

    async fn exists(&self, target: &TargetLocation, display_name: &str) -> StorageResult<bool> {
        validate_display_name(display_name)?;
        let path = key_to_path(&self.base_path, &entry_key(target, display_name))?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn create_entry(
        &self,
        target: &TargetLocation,
        display_name: &str,
        _mime_type: &str,
    ) -> StorageResult<(PendingEntry, EntryWriter)> {
        validate_display_name(display_name)?;

        let key = entry_key(target, display_name);
        let final_path = key_to_path(&self.base_path, &key)?;
        let dir = final_path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey(key.clone()))?
            .to_path_buf();
        self.ensure_dir(&dir).await?;

        // finalize can only replace a regular file
        if let Ok(meta) = fs::symlink_metadata(&final_path).await {
            if !meta.is_file() {
                return Err(StorageError::CreateFailed(format!(
                    "Path exists but is not a regular file: {}",
                    final_path.display()
                )));
            }
        }

        let entry = PendingEntry {
            id: uuid::Uuid::new_v4(),
            key,
            display_name: display_name.to_string(),
            uri: file_uri(&final_path),
        };
        let pending_path = self.pending_path(&entry)?;

        let file = fs::File::create(&pending_path).await.map_err(|e| {
            StorageError::from_io(e, |msg| {
                StorageError::CreateFailed(format!(
                    "Failed to create file {}: {}",
                    pending_path.display(),
                    msg
                ))
            })
        })?;

        tracing::debug!(
            path = %pending_path.display(),
            key = %entry.key,
            "Created pending entry"
        );

        Ok((entry, Box::pin(file)))
    }

    async fn finalize(&self, entry: &PendingEntry) -> StorageResult<()> {
        let pending_path = self.pending_path(entry)?;
        let final_path = self.final_path(entry)?;

        fs::rename(&pending_path, &final_path).await.map_err(|e| {
            StorageError::FinalizeFailed(format!(
                "Failed to move {} to {}: {}",
                pending_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %final_path.display(),
            key = %entry.key,
            "Path-based entry finalized"
        );

        Ok(())
    }

    async fn delete(&self, entry: &PendingEntry) -> StorageResult<()> {
        let pending_path = self.pending_path(entry)?;

        if !fs::try_exists(&pending_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&pending_path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                pending_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %pending_path.display(),
            key = %entry.key,
            "Pending entry deleted"
        );

        Ok(())
    }

    async fn resolve_path(&self, entry: &PendingEntry) -> StorageResult<String> {
        let final_path = self.final_path(entry)?;
        let canonical = fs::canonicalize(&final_path)
            .await
            .map_err(|_| StorageError::NotFound(entry.key.clone()))?;
        Ok(canonical.display().to_string())
    }
}
