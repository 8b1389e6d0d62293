//! Mediasave Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! collaborator contracts shared by every mediasave component.

pub mod capability;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod permission_gate;
pub mod storage_types;

// Re-export commonly used types
pub use capability::{AcceptAllValidator, CapabilityValidator, CapabilityVerdict};
pub use config::Config;
pub use error::{ErrorCode, ErrorMetadata, LogLevel, PersistError};
pub use models::{
    compose_file_name, ConflictPolicy, FileCategory, FileType, PersistRequest, PersistResult,
    TargetLocation,
};
pub use permission_gate::{PermissionGate, PermissionStatus, StaticPermissionGate};
pub use storage_types::StorageModel;
