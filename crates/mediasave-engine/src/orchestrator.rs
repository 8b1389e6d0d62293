//! Persist orchestrator.
//!
//! One persist call walks a fixed sequence: validate, classify, check the
//! format, ask for permission, resolve the destination name, open a pending
//! entry, write it in chunks, finalize, then report where it landed. Every
//! failure collapses to a [`PersistError`] and from there to a
//! [`PersistResult`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use mediasave_core::constants::{CHUNK_SIZE, MAX_RENAME_ATTEMPTS};
use mediasave_core::{
    CapabilityValidator, Config, ErrorMetadata, LogLevel, PermissionGate, PermissionStatus,
    PersistError, PersistRequest, PersistResult, StaticPermissionGate, StorageModel,
    TargetLocation,
};
use mediasave_storage::{
    create_storage, AbsentProbe, ConflictResolver, EntryWriter, ExistenceProbe, Resolution,
    Storage, StorageResult, TargetProbe,
};
use tokio::io::{self, AsyncWriteExt};

use crate::capability::{check_capability, CodecTableValidator, StaticEncoderSource};
use crate::classifier::classify;
use crate::profile::CategoryProfile;

/// Persists byte buffers into one storage backend.
///
/// The backend, and with it the conflict resolver, is fixed for the lifetime
/// of the saver. A saver is cheap to share behind an `Arc`; calls do not
/// share any state besides the collaborators.
pub struct FileSaver {
    storage: Arc<dyn Storage>,
    validator: Arc<dyn CapabilityValidator>,
    permission_gate: Arc<dyn PermissionGate>,
    resolver: ConflictResolver,
    chunk_size: usize,
}

impl FileSaver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let resolver = ConflictResolver::for_backend(storage.backend_type(), MAX_RENAME_ATTEMPTS);
        Self {
            storage,
            validator: Arc::new(CodecTableValidator::<StaticEncoderSource>::default()),
            permission_gate: Arc::new(StaticPermissionGate::default()),
            resolver,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Build a saver with the backend, validator and gate described by `config`.
    pub async fn from_config(config: &Config) -> StorageResult<Self> {
        let storage = create_storage(config).await?;

        let source = match &config.encoders {
            Some(encoders) => StaticEncoderSource::new(encoders.iter().cloned()),
            None => StaticEncoderSource::default(),
        };

        tracing::info!(
            backend = %storage.backend_type(),
            root = %config.storage_root.display(),
            "File saver initialized"
        );

        Ok(Self::new(storage)
            .with_validator(Arc::new(CodecTableValidator::new(
                source,
                config.platform_version,
            )))
            .with_permission_gate(Arc::new(StaticPermissionGate(config.permission)))
            .with_chunk_size(config.chunk_size_bytes)
            .with_max_rename_attempts(config.max_rename_attempts))
    }

    pub fn with_validator(mut self, validator: Arc<dyn CapabilityValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_permission_gate(mut self, permission_gate: Arc<dyn PermissionGate>) -> Self {
        self.permission_gate = permission_gate;
        self
    }

    /// Zero is treated as one byte per chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_rename_attempts(mut self, max_attempts: u32) -> Self {
        self.resolver = ConflictResolver::for_backend(self.storage.backend_type(), max_attempts);
        self
    }

    pub fn backend_type(&self) -> StorageModel {
        self.storage.backend_type()
    }

    /// Persist `request` and report the outcome.
    ///
    /// Never panics: a panic inside the pipeline is reported as a
    /// `PLATFORM_ERROR` carrying the panic message.
    #[tracing::instrument(
        skip(self, request),
        fields(
            base_name = %request.base_name,
            extension = %request.file_type.extension(),
            policy = %request.policy,
            backend = %self.storage.backend_type()
        )
    )]
    pub async fn save(&self, request: PersistRequest) -> PersistResult {
        let outcome = match AssertUnwindSafe(self.persist(request)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => Err(PersistError::Platform(panic_message(payload))),
        };

        match &outcome {
            Ok((path, uri)) => {
                tracing::info!(path = %path, uri = %uri, "File saved");
            }
            Err(err) => log_failure(err),
        }

        outcome.into()
    }

    async fn persist(&self, request: PersistRequest) -> Result<(String, String), PersistError> {
        if request.bytes.is_empty() {
            return Err(PersistError::InvalidFile("File data is empty".to_string()));
        }
        let base_name = request.base_name.trim();
        if base_name.is_empty() || base_name.contains('/') || base_name.contains('\\') {
            return Err(PersistError::InvalidFile(format!(
                "File name is not usable: {:?}",
                request.base_name
            )));
        }

        let file_type = classify(
            Some(request.file_type.extension()),
            Some(request.file_type.mime_type()),
        );
        let backend = self.storage.backend_type();
        let mut target = TargetLocation::new(
            file_type.category(),
            request.sub_collection.as_deref(),
            backend,
        )?;

        check_capability(&file_type, self.validator.as_ref())?;
        let profile = CategoryProfile::for_category(file_type.category());

        let access = self.request_access().await?;
        let probe_existing = match access {
            PermissionStatus::Full => true,
            PermissionStatus::Limited => {
                tracing::debug!(
                    collection = profile.collection_dir,
                    "Limited access, saving to the collection root"
                );
                target = target.without_sub_collection();
                // Scoped backends number on insert; path-based ones still need the probe.
                backend == StorageModel::PathBased
            }
            PermissionStatus::Denied => {
                return Err(PersistError::PermissionDenied(format!(
                    "Permission denied to write to {}",
                    profile.collection_dir
                )));
            }
        };

        let target_probe = TargetProbe::new(self.storage.as_ref(), &target);
        let probe: &dyn ExistenceProbe = if probe_existing {
            &target_probe
        } else {
            &AbsentProbe
        };

        let display_name = match self
            .resolver
            .resolve(probe, base_name, file_type.extension(), request.policy)
            .await?
        {
            Resolution::Use(name) => name,
            Resolution::Declined => {
                return Err(PersistError::FileExists(mediasave_core::compose_file_name(
                    base_name,
                    file_type.extension(),
                )));
            }
        };

        let (entry, mut writer) = self
            .storage
            .create_entry(&target, &display_name, file_type.mime_type())
            .await?;

        if let Err(err) = write_chunks(&mut writer, &request.bytes, self.chunk_size).await {
            drop(writer);
            if let Err(cleanup_err) = self.storage.delete(&entry).await {
                tracing::warn!(
                    error = %cleanup_err,
                    key = %entry.key,
                    "Failed to clean up partial entry"
                );
            }
            return Err(write_error(err));
        }
        drop(writer);

        if let Err(err) = self.storage.finalize(&entry).await {
            tracing::warn!(error = %err, key = %entry.key, "Failed to finalize entry");
        }

        let path = match self.storage.resolve_path(&entry).await {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(error = %err, key = %entry.key, "Could not resolve entry path");
                backend.path_sentinel().to_string()
            }
        };

        Ok((path, entry.uri))
    }

    /// Ask the gate off the async executor; it may block on a user prompt.
    async fn request_access(&self) -> Result<PermissionStatus, PersistError> {
        let gate = Arc::clone(&self.permission_gate);
        tokio::task::spawn_blocking(move || gate.request_access())
            .await
            .map_err(|e| PersistError::Platform(format!("Permission request failed: {}", e)))
    }
}

async fn write_chunks(writer: &mut EntryWriter, data: &[u8], chunk_size: usize) -> io::Result<()> {
    for chunk in data.chunks(chunk_size) {
        writer.write_all(chunk).await?;
    }
    writer.flush().await?;
    writer.shutdown().await
}

fn write_error(err: io::Error) -> PersistError {
    match err.kind() {
        io::ErrorKind::StorageFull => {
            PersistError::StorageFull(format!("Insufficient storage space: {}", err))
        }
        _ => PersistError::FileIo(format!("Failed to write file: {}", err)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown error".to_string()
    }
}

fn log_failure(err: &PersistError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error_code = %code, error = %err, "Save rejected"),
        LogLevel::Warn => tracing::warn!(error_code = %code, error = %err, "Save failed"),
        LogLevel::Error => tracing::error!(error_code = %code, error = %err, "Save failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_mapping() {
        let full = write_error(io::Error::from(io::ErrorKind::StorageFull));
        assert!(matches!(full, PersistError::StorageFull(_)));

        let other = write_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(other.to_string(), "Failed to write file: pipe closed");
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(42u8)), "Unknown error");
    }
}
