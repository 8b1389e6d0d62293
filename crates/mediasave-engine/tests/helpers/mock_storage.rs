use std::collections::{HashMap, HashSet};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use mediasave_core::{StorageModel, TargetLocation};
use mediasave_storage::{EntryWriter, PendingEntry, Storage, StorageError, StorageResult};
use tokio::io::AsyncWrite;
use uuid::Uuid;

/// One recorded backend invocation, keyed by `<relative dir>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exists(String),
    Create(String),
    Finalize(String),
    Delete(String),
    ResolvePath(String),
}

#[derive(Debug, Clone, Copy)]
pub enum CreateFailure {
    Io,
    PermissionDenied,
    StorageFull,
    Panic,
}

/// In-memory storage that records every call and can inject failures.
pub struct MockStorage {
    model: StorageModel,
    existing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<Call>>,
    pending: Mutex<HashMap<Uuid, Arc<Mutex<Vec<u8>>>>>,
    finalized: Mutex<HashMap<String, Vec<u8>>>,
    writes: Arc<AtomicUsize>,
    write_failure: Option<(usize, io::ErrorKind)>,
    create_failure: Option<CreateFailure>,
    fail_delete: bool,
    fail_finalize: bool,
    fail_resolve: bool,
}

impl MockStorage {
    pub fn new(model: StorageModel) -> Self {
        Self {
            model,
            existing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
            finalized: Mutex::new(HashMap::new()),
            writes: Arc::new(AtomicUsize::new(0)),
            write_failure: None,
            create_failure: None,
            fail_delete: false,
            fail_finalize: false,
            fail_resolve: false,
        }
    }

    pub fn path_based() -> Self {
        Self::new(StorageModel::PathBased)
    }

    pub fn scoped() -> Self {
        Self::new(StorageModel::Scoped)
    }

    pub fn with_existing<I: IntoIterator<Item = &'static str>>(self, keys: I) -> Self {
        self.existing
            .lock()
            .unwrap()
            .extend(keys.into_iter().map(String::from));
        self
    }

    /// Writers fail once more than `after` bytes would have been written.
    pub fn failing_writes(mut self, after: usize, kind: io::ErrorKind) -> Self {
        self.write_failure = Some((after, kind));
        self
    }

    pub fn failing_create(mut self, failure: CreateFailure) -> Self {
        self.create_failure = Some(failure);
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_finalize(mut self) -> Self {
        self.fail_finalize = true;
        self
    }

    pub fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn created_keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Create(key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `poll_write` calls that accepted data.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn finalized(&self, key: &str) -> Option<Vec<u8>> {
        self.finalized.lock().unwrap().get(key).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn key(target: &TargetLocation, display_name: &str) -> String {
    format!("{}/{}", target.relative_dir(), display_name)
}

#[async_trait]
impl Storage for MockStorage {
    fn backend_type(&self) -> StorageModel {
        self.model
    }

    async fn exists(&self, target: &TargetLocation, display_name: &str) -> StorageResult<bool> {
        let key = key(target, display_name);
        self.record(Call::Exists(key.clone()));
        Ok(self.existing.lock().unwrap().contains(&key))
    }

    async fn create_entry(
        &self,
        target: &TargetLocation,
        display_name: &str,
        _mime_type: &str,
    ) -> StorageResult<(PendingEntry, EntryWriter)> {
        let key = key(target, display_name);
        self.record(Call::Create(key.clone()));

        match self.create_failure {
            Some(CreateFailure::Io) => {
                return Err(StorageError::CreateFailed("disk unavailable".to_string()))
            }
            Some(CreateFailure::PermissionDenied) => {
                return Err(StorageError::PermissionDenied("read-only volume".to_string()))
            }
            Some(CreateFailure::StorageFull) => {
                return Err(StorageError::StorageFull("no space left".to_string()))
            }
            Some(CreateFailure::Panic) => panic!("mock storage exploded"),
            None => {}
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let entry = PendingEntry {
            id: Uuid::new_v4(),
            key: key.clone(),
            display_name: display_name.to_string(),
            uri: format!("mock://{}", key),
        };
        self.pending.lock().unwrap().insert(entry.id, buffer.clone());

        let writer = MockWriter {
            buffer,
            writes: self.writes.clone(),
            failure: self.write_failure,
        };
        Ok((entry, Box::pin(writer)))
    }

    async fn finalize(&self, entry: &PendingEntry) -> StorageResult<()> {
        self.record(Call::Finalize(entry.key.clone()));
        if self.fail_finalize {
            return Err(StorageError::FinalizeFailed("registry busy".to_string()));
        }

        let buffer = self
            .pending
            .lock()
            .unwrap()
            .remove(&entry.id)
            .ok_or_else(|| StorageError::NotFound(entry.key.clone()))?;
        let data = buffer.lock().unwrap().clone();
        self.finalized.lock().unwrap().insert(entry.key.clone(), data);
        self.existing.lock().unwrap().insert(entry.key.clone());
        Ok(())
    }

    async fn delete(&self, entry: &PendingEntry) -> StorageResult<()> {
        self.record(Call::Delete(entry.key.clone()));
        if self.fail_delete {
            return Err(StorageError::DeleteFailed("busy".to_string()));
        }
        self.pending.lock().unwrap().remove(&entry.id);
        Ok(())
    }

    async fn resolve_path(&self, entry: &PendingEntry) -> StorageResult<String> {
        self.record(Call::ResolvePath(entry.key.clone()));
        if self.fail_resolve {
            return Err(StorageError::NotFound(entry.key.clone()));
        }
        Ok(format!("/mock/{}", entry.key))
    }
}

struct MockWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
    writes: Arc<AtomicUsize>,
    failure: Option<(usize, io::ErrorKind)>,
}

impl AsyncWrite for MockWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let mut buffer = this.buffer.lock().unwrap();
        if let Some((after, kind)) = this.failure {
            if buffer.len() + buf.len() > after {
                return Poll::Ready(Err(io::Error::new(kind, "injected write failure")));
            }
        }
        buffer.extend_from_slice(buf);
        this.writes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
