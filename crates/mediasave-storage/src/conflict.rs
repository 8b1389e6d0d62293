//! Conflict resolution for both storage models.
//!
//! A resolver turns (existence probe, base name, extension, policy) into the
//! display name to create, or declines. Resolvers never touch storage beyond
//! the probe, so the same probe answers and policy always give the same
//! outcome.

use async_trait::async_trait;
use mediasave_core::{compose_file_name, ConflictPolicy, StorageModel, TargetLocation};

use crate::keys::numbered_name;
use crate::traits::{Storage, StorageError, StorageResult};

/// Answers "is an entry with this display name already visible?".
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    async fn exists(&self, display_name: &str) -> StorageResult<bool>;
}

/// Probe backed by a storage backend and a fixed target.
pub struct TargetProbe<'a> {
    storage: &'a dyn Storage,
    target: &'a TargetLocation,
}

impl<'a> TargetProbe<'a> {
    pub fn new(storage: &'a dyn Storage, target: &'a TargetLocation) -> Self {
        Self { storage, target }
    }
}

#[async_trait]
impl ExistenceProbe for TargetProbe<'_> {
    async fn exists(&self, display_name: &str) -> StorageResult<bool> {
        self.storage.exists(self.target, display_name).await
    }
}

/// Probe for callers without read access: nothing is ever reported as present.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentProbe;

#[async_trait]
impl ExistenceProbe for AbsentProbe {
    async fn exists(&self, _display_name: &str) -> StorageResult<bool> {
        Ok(false)
    }
}

/// Outcome of conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Create the entry under this display name.
    Use(String),
    /// An entry exists and the policy forbids touching it.
    Declined,
}

/// Conflict resolution strategy, chosen by the backend's storage model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolver {
    /// The backend can check candidate names synchronously; auto-rename
    /// probes `base (1).ext`, `base (2).ext`, ... up to `max_attempts`.
    PathBased { max_attempts: u32 },
    /// The backend numbers colliding names itself on insert.
    Registry,
}

impl ConflictResolver {
    pub fn for_backend(model: StorageModel, max_attempts: u32) -> Self {
        match model {
            StorageModel::PathBased => ConflictResolver::PathBased { max_attempts },
            StorageModel::Scoped => ConflictResolver::Registry,
        }
    }

    pub async fn resolve(
        &self,
        probe: &dyn ExistenceProbe,
        base_name: &str,
        extension: &str,
        policy: ConflictPolicy,
    ) -> StorageResult<Resolution> {
        let original = compose_file_name(base_name, extension);

        if !probe.exists(&original).await? {
            return Ok(Resolution::Use(original));
        }

        tracing::debug!(
            name = %original,
            policy = %policy,
            resolver = ?self,
            "Entry already exists"
        );

        match (self, policy) {
            (_, ConflictPolicy::Fail) => Ok(Resolution::Declined),

            (ConflictResolver::PathBased { max_attempts }, ConflictPolicy::AutoRename) => {
                auto_rename(probe, base_name, extension, *max_attempts).await
            }

            // The registry numbers the name itself when the entry is inserted.
            (ConflictResolver::Registry, ConflictPolicy::AutoRename) => {
                Ok(Resolution::Use(original))
            }

            // Overwrite and skip keep the colliding name. On path-based storage
            // the write replaces the file; the registry has no pre-emptive
            // delete and falls back to its own numbering.
            (_, ConflictPolicy::Overwrite) | (_, ConflictPolicy::Skip) => {
                Ok(Resolution::Use(original))
            }
        }
    }
}

async fn auto_rename(
    probe: &dyn ExistenceProbe,
    base_name: &str,
    extension: &str,
    max_attempts: u32,
) -> StorageResult<Resolution> {
    for n in 1..=max_attempts {
        let candidate = numbered_name(base_name, extension, n);
        if !probe.exists(&candidate).await? {
            return Ok(Resolution::Use(candidate));
        }
    }

    tracing::warn!(
        base_name = %base_name,
        extension = %extension,
        max_attempts,
        "Auto-rename exhausted all candidates"
    );
    Err(StorageError::NameExhausted(max_attempts))
}
