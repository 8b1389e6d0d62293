//! Mediasave Storage Library
//!
//! This crate provides the raw storage contract and its two implementations:
//!
//! - **Scoped** (`ScopedStorage`): entries are tracked in a registry keyed by
//!   relative path and display name; the registry numbers colliding names on
//!   insert (`photo.jpg` → `photo (1).jpg`).
//! - **Path-based** (`PathBasedStorage`): a literal directory tree the engine
//!   probes and writes directly.
//!
//! Both create entries in a pending state. A pending entry lives on disk as
//! `.pending-<id>-<name>` next to its final location and only becomes visible
//! under its real name once `finalize` runs.
//!
//! The conflict resolvers matching each backend live in `conflict`.

pub mod conflict;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-path")]
pub mod path_based;
#[cfg(feature = "storage-scoped")]
pub mod scoped;
pub mod traits;

// Re-export commonly used types
pub use conflict::{AbsentProbe, ConflictResolver, ExistenceProbe, Resolution, TargetProbe};
pub use factory::create_storage;
pub use mediasave_core::StorageModel;
#[cfg(feature = "storage-path")]
pub use path_based::PathBasedStorage;
#[cfg(feature = "storage-scoped")]
pub use scoped::{EntryRecord, ScopedStorage};
pub use traits::{EntryWriter, PendingEntry, Storage, StorageError, StorageResult};
