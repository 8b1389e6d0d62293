//! Instance registry.
//!
//! Foreign callers hold integer ids instead of engine pointers. Ids start at
//! 1 and are never reused within a registry. The map is guarded by a single
//! mutex that is held only for lookup, insert and remove.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mediasave_core::{ErrorCode, PersistRequest};
use mediasave_engine::FileSaver;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::request::SaveRequest;
use crate::response::SaveResponse;

#[derive(Default)]
struct Instances {
    last_id: u64,
    savers: HashMap<u64, Arc<FileSaver>>,
}

/// Registry of engine instances addressed by id.
pub struct SaverRegistry {
    runtime: Handle,
    instances: Mutex<Instances>,
}

impl SaverRegistry {
    /// Create a registry that runs saves on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            instances: Mutex::new(Instances::default()),
        }
    }

    fn instances(&self) -> MutexGuard<'_, Instances> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `saver` and return its id.
    pub fn init(&self, saver: FileSaver) -> u64 {
        let mut instances = self.instances();
        instances.last_id += 1;
        let id = instances.last_id;
        instances.savers.insert(id, Arc::new(saver));

        tracing::debug!(instance_id = id, "File saver registered");
        id
    }

    pub fn get(&self, id: u64) -> Option<Arc<FileSaver>> {
        self.instances().savers.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.instances().savers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Save through instance `id` and wait for the response.
    ///
    /// The save itself runs as its own task, so a panic inside it still
    /// yields a `PLATFORM_ERROR` response.
    pub async fn save_bytes(&self, id: u64, request: SaveRequest) -> SaveResponse {
        match self.get(id) {
            Some(saver) => run_save(&self.runtime, saver, request.into()).await,
            None => instance_not_found(id),
        }
    }

    /// Save through instance `id` in the background and hand the response to
    /// `callback` exactly once.
    pub fn save_bytes_async<F>(&self, id: u64, request: SaveRequest, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(SaveResponse) + Send + 'static,
    {
        let saver = self.get(id);
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let response = match saver {
                Some(saver) => run_save(&runtime, saver, request.into()).await,
                None => instance_not_found(id),
            };
            callback(response);
        })
    }

    /// Drop instance `id`. Unknown ids are ignored.
    pub fn dispose(&self, id: u64) -> bool {
        let removed = self.instances().savers.remove(&id).is_some();
        if removed {
            tracing::debug!(instance_id = id, "File saver disposed");
        }
        removed
    }
}

async fn run_save(runtime: &Handle, saver: Arc<FileSaver>, request: PersistRequest) -> SaveResponse {
    match runtime.spawn(async move { saver.save(request).await }).await {
        Ok(result) => result.into(),
        Err(e) => {
            tracing::error!(error = %e, "Save task failed");
            SaveResponse::failure(ErrorCode::PlatformError, format!("Save task failed: {}", e))
        }
    }
}

fn instance_not_found(id: u64) -> SaveResponse {
    tracing::warn!(instance_id = id, "Unknown file saver instance");
    SaveResponse::failure(ErrorCode::PlatformError, "FileSaver instance not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasave_storage::PathBasedStorage;
    use tempfile::tempdir;
    use tokio::sync::oneshot;

    async fn path_saver(root: &std::path::Path) -> FileSaver {
        FileSaver::new(Arc::new(PathBasedStorage::new(root).await.unwrap()))
    }

    fn photo() -> SaveRequest {
        SaveRequest::new(b"abc".to_vec(), "photo", "jpg", "image/jpeg")
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let dir = tempdir().unwrap();
        let registry = SaverRegistry::new(Handle::current());

        let first = registry.init(path_saver(dir.path()).await);
        let second = registry.init(path_saver(dir.path()).await);

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_save_bytes() {
        let dir = tempdir().unwrap();
        let registry = SaverRegistry::new(Handle::current());
        let id = registry.init(path_saver(dir.path()).await);

        let response = registry.save_bytes(id, photo()).await;

        assert!(response.success);
        assert!(response.file_path.unwrap().ends_with("photo.jpg"));
        assert!(response.uri.unwrap().starts_with("file:///"));
        assert!(response.error_code.is_none());
        assert!(response.error_message.is_none());
    }

    #[tokio::test]
    async fn test_fail_mode_reports_file_exists() {
        let dir = tempdir().unwrap();
        let registry = SaverRegistry::new(Handle::current());
        let id = registry.init(path_saver(dir.path()).await);

        assert!(registry.save_bytes(id, photo()).await.success);
        let response = registry.save_bytes(id, photo().with_conflict_mode(2)).await;

        assert!(!response.success);
        assert_eq!(response.error_code.as_deref(), Some("FILE_EXISTS"));
    }

    #[tokio::test]
    async fn test_unknown_id_is_platform_error() {
        let registry = SaverRegistry::new(Handle::current());

        let response = registry.save_bytes(99, photo()).await;

        assert_eq!(response.error_code.as_deref(), Some("PLATFORM_ERROR"));
        assert_eq!(
            response.error_message.as_deref(),
            Some("FileSaver instance not found")
        );
    }

    #[tokio::test]
    async fn test_dispose_removes_instance() {
        let dir = tempdir().unwrap();
        let registry = SaverRegistry::new(Handle::current());
        let id = registry.init(path_saver(dir.path()).await);

        assert!(registry.dispose(id));
        assert!(!registry.dispose(id));
        assert!(registry.is_empty());

        let response = registry.save_bytes(id, photo()).await;
        assert_eq!(response.error_code.as_deref(), Some("PLATFORM_ERROR"));

        // ids are not reused
        let next = registry.init(path_saver(dir.path()).await);
        assert_eq!(next, id + 1);
    }

    #[tokio::test]
    async fn test_save_bytes_async_calls_back_once() {
        let dir = tempdir().unwrap();
        let registry = SaverRegistry::new(Handle::current());
        let id = registry.init(path_saver(dir.path()).await);

        let (tx, rx) = oneshot::channel();
        let handle = registry.save_bytes_async(id, photo(), move |response| {
            let _ = tx.send(response);
        });

        handle.await.unwrap();
        let response = rx.await.unwrap();
        assert!(response.success);
        assert!(dir.path().join("Pictures/photo.jpg").exists());
    }

    #[tokio::test]
    async fn test_save_bytes_async_unknown_id() {
        let registry = SaverRegistry::new(Handle::current());

        let (tx, rx) = oneshot::channel();
        registry.save_bytes_async(7, photo(), move |response| {
            let _ = tx.send(response);
        });

        let response = rx.await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error_code.as_deref(), Some("PLATFORM_ERROR"));
    }
}
