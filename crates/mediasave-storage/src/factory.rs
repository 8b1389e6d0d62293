#[cfg(feature = "storage-path")]
use crate::PathBasedStorage;
#[cfg(feature = "storage-scoped")]
use crate::ScopedStorage;
use crate::{Storage, StorageError, StorageModel, StorageResult};
use mediasave_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    if config.storage_root.as_os_str().is_empty() {
        return Err(StorageError::ConfigError(
            "MEDIASAVE_STORAGE_ROOT not configured".to_string(),
        ));
    }

    match config.storage_model {
        #[cfg(feature = "storage-scoped")]
        StorageModel::Scoped => {
            let storage = ScopedStorage::new(config.storage_root.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-scoped"))]
        StorageModel::Scoped => Err(StorageError::ConfigError(
            "Scoped storage backend not available (storage-scoped feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-path")]
        StorageModel::PathBased => {
            let storage = PathBasedStorage::new(config.storage_root.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-path"))]
        StorageModel::PathBased => Err(StorageError::ConfigError(
            "Path-based storage backend not available (storage-path feature not enabled)"
                .to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-scoped", feature = "storage-path"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_storage_follows_model() {
        let dir = tempdir().unwrap();

        for model in [StorageModel::Scoped, StorageModel::PathBased] {
            let config = Config::default()
                .with_storage_root(dir.path().join(model.to_string()))
                .with_storage_model(model);
            let storage = create_storage(&config).await.unwrap();
            assert_eq!(storage.backend_type(), model);
        }
    }

    #[tokio::test]
    async fn test_create_storage_rejects_empty_root() {
        let config = Config::default().with_storage_root("");
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
