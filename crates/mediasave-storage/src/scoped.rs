use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mediasave_core::{StorageModel, TargetLocation};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::keys::{
    entry_key, key_to_path, normalize_relative_path, numbered_name, pending_file_name,
    split_display_name, validate_display_name,
};
use crate::traits::{EntryWriter, PendingEntry, Storage, StorageError, StorageResult};

const INDEX_FILE_NAME: &str = ".mediasave-index.json";

/// One row of the scoped registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: Uuid,
    pub display_name: String,
    /// Relative directory with a trailing slash, e.g. `Pictures/MyAlbum/`.
    pub relative_path: String,
    pub mime_type: String,
    pub is_pending: bool,
    pub date_added: DateTime<Utc>,
}

impl EntryRecord {
    fn key(&self) -> String {
        format!("{}{}", self.relative_path, self.display_name)
    }
}

/// Scoped storage implementation
///
/// Entries are registered in a JSON index kept at the storage root and
/// mirrored by files on disk. Inserting a display name that is already
/// registered in the same relative path yields `base (n).ext` with the
/// smallest free `n`; pending rows count as taken.
pub struct ScopedStorage {
    base_path: PathBuf,
    index_path: PathBuf,
    records: Mutex<Vec<EntryRecord>>,
}

impl ScopedStorage {
    /// Open (or create) a scoped store rooted at `base_path`.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let index_path = base_path.join(INDEX_FILE_NAME);
        let records = match fs::read(&index_path).await {
            Ok(data) => serde_json::from_slice(&data).map_err(|e| {
                StorageError::BackendError(format!(
                    "Corrupt registry index {}: {}",
                    index_path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let storage = ScopedStorage {
            base_path,
            index_path,
            records: Mutex::new(Vec::new()),
        };
        let records = storage.prune_pending(records).await?;

        tracing::debug!(
            path = %storage.base_path.display(),
            entries = records.len(),
            "Opened scoped registry"
        );

        *storage.records.lock().await = records;
        Ok(storage)
    }

    /// Drop rows still pending from an earlier session, along with their
    /// pending files.
    ///
    /// Pending handles do not outlive the process, so such rows can never be
    /// finalized. Within a session a row whose finalize failed stays pending
    /// and keeps its display name taken until the store is reopened.
    async fn prune_pending(&self, records: Vec<EntryRecord>) -> StorageResult<Vec<EntryRecord>> {
        let (stale, live): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.is_pending);
        if stale.is_empty() {
            return Ok(live);
        }

        for record in &stale {
            let path = self.pending_path(record)?;
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove stale pending file"
                ),
            }
        }

        tracing::info!(pruned = stale.len(), "Pruned stale pending registry rows");
        self.persist(&live).await?;
        Ok(live)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Registry row for `id`, if any.
    pub async fn entry(&self, id: Uuid) -> Option<EntryRecord> {
        self.records.lock().await.iter().find(|r| r.id == id).cloned()
    }

    /// Snapshot of every registry row.
    pub async fn entries(&self) -> Vec<EntryRecord> {
        self.records.lock().await.clone()
    }

    async fn persist(&self, records: &[EntryRecord]) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(records).map_err(|e| {
            StorageError::BackendError(format!("Failed to serialize registry: {}", e))
        })?;

        let tmp_path = self.index_path.with_extension("json.tmp");
        fs::write(&tmp_path, &data)
            .await
            .map_err(|e| StorageError::from_io(e, StorageError::BackendError))?;
        fs::rename(&tmp_path, &self.index_path)
            .await
            .map_err(|e| StorageError::from_io(e, StorageError::BackendError))?;
        Ok(())
    }

    fn pending_path(&self, record: &EntryRecord) -> StorageResult<PathBuf> {
        let key = format!(
            "{}{}",
            record.relative_path,
            pending_file_name(record.id, &record.display_name)
        );
        key_to_path(&self.base_path, &key)
    }

    fn final_path(&self, record: &EntryRecord) -> StorageResult<PathBuf> {
        key_to_path(&self.base_path, &record.key())
    }
}

fn is_registered(records: &[EntryRecord], relative_path: &str, display_name: &str) -> bool {
    records
        .iter()
        .any(|r| r.relative_path == relative_path && r.display_name == display_name)
}

/// Display name the registry assigns on insert.
fn assign_display_name(records: &[EntryRecord], relative_path: &str, requested: &str) -> String {
    if !is_registered(records, relative_path, requested) {
        return requested.to_string();
    }

    let (base, ext) = split_display_name(requested);
    // The registry is finite, so a free index always exists.
    (1u32..)
        .map(|n| numbered_name(base, ext, n))
        .find(|candidate| !is_registered(records, relative_path, candidate))
        .unwrap_or_else(|| requested.to_string())
}

#[async_trait]
impl Storage for ScopedStorage {
    fn backend_type(&self) -> StorageModel {
        StorageModel::Scoped
    }

    async fn exists(&self, target: &TargetLocation, display_name: &str) -> StorageResult<bool> {
        let relative_path = normalize_relative_path(&target.relative_dir());
        let records = self.records.lock().await;
        Ok(records.iter().any(|r| {
            !r.is_pending && r.relative_path == relative_path && r.display_name == display_name
        }))
    }

    async fn create_entry(
        &self,
        target: &TargetLocation,
        display_name: &str,
        mime_type: &str,
    ) -> StorageResult<(PendingEntry, EntryWriter)> {
        validate_display_name(display_name)?;

        let relative_path = normalize_relative_path(&target.relative_dir());
        let mut records = self.records.lock().await;

        let assigned = assign_display_name(&records, &relative_path, display_name);
        let record = EntryRecord {
            id: Uuid::new_v4(),
            display_name: assigned,
            relative_path,
            mime_type: mime_type.to_string(),
            is_pending: true,
            date_added: Utc::now(),
        };

        let pending_path = self.pending_path(&record)?;
        let dir = pending_path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey(record.key()))?
            .to_path_buf();

        records.push(record.clone());
        self.persist(&records).await?;

        let opened = match fs::create_dir_all(&dir).await {
            Ok(()) => fs::File::create(&pending_path).await,
            Err(e) => Err(e),
        };

        let file = match opened {
            Ok(file) => file,
            Err(e) => {
                records.retain(|r| r.id != record.id);
                if let Err(persist_err) = self.persist(&records).await {
                    tracing::warn!(
                        error = %persist_err,
                        id = %record.id,
                        "Failed to roll back registry row"
                    );
                }
                return Err(StorageError::from_io(e, |msg| {
                    StorageError::CreateFailed(format!(
                        "Failed to create file {}: {}",
                        pending_path.display(),
                        msg
                    ))
                }));
            }
        };

        if record.display_name != display_name {
            tracing::debug!(
                requested = %display_name,
                assigned = %record.display_name,
                "Registry renamed colliding entry"
            );
        }

        let entry = PendingEntry {
            id: record.id,
            key: entry_key(target, &record.display_name),
            display_name: record.display_name.clone(),
            uri: format!("content://mediasave/{}/{}", target.category.as_str(), record.id),
        };

        Ok((entry, Box::pin(file)))
    }

    async fn finalize(&self, entry: &PendingEntry) -> StorageResult<()> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| r.id == entry.id)
            .ok_or_else(|| StorageError::NotFound(entry.uri.clone()))?;

        let pending_path = self.pending_path(&records[index])?;
        let final_path = self.final_path(&records[index])?;

        fs::rename(&pending_path, &final_path).await.map_err(|e| {
            StorageError::FinalizeFailed(format!(
                "Failed to move {} to {}: {}",
                pending_path.display(),
                final_path.display(),
                e
            ))
        })?;

        records[index].is_pending = false;
        self.persist(&records).await?;

        tracing::info!(
            id = %entry.id,
            key = %entry.key,
            "Scoped entry finalized"
        );

        Ok(())
    }

    async fn delete(&self, entry: &PendingEntry) -> StorageResult<()> {
        let mut records = self.records.lock().await;
        let Some(index) = records.iter().position(|r| r.id == entry.id) else {
            return Ok(());
        };

        let record = &records[index];
        let path = if record.is_pending {
            self.pending_path(record)?
        } else {
            self.final_path(record)?
        };

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }
        records.remove(index);
        self.persist(&records).await?;

        tracing::info!(
            id = %entry.id,
            key = %entry.key,
            "Scoped entry deleted"
        );

        Ok(())
    }

    async fn resolve_path(&self, entry: &PendingEntry) -> StorageResult<String> {
        let record = self
            .entry(entry.id)
            .await
            .ok_or_else(|| StorageError::NotFound(entry.uri.clone()))?;
        let path = if record.is_pending {
            self.pending_path(&record)?
        } else {
            self.final_path(&record)?
        };
        let canonical = fs::canonicalize(&path)
            .await
            .map_err(|_| StorageError::NotFound(entry.uri.clone()))?;
        Ok(canonical.display().to_string())
    }
}
