//! Test helpers for engine integration tests.
//!
//! Run from workspace root: `cargo test -p mediasave-engine`.

#![allow(dead_code)]

pub mod mock_storage;

use mediasave_core::{
    CapabilityValidator, CapabilityVerdict, ConflictPolicy, FileType, PermissionGate,
    PermissionStatus, PersistRequest,
};

/// Validator that rejects every format it is asked about.
pub struct RejectAllValidator;

impl CapabilityValidator for RejectAllValidator {
    fn check(&self, _file_type: &FileType) -> CapabilityVerdict {
        CapabilityVerdict::Unsupported("no encoder on this host".to_string())
    }
}

/// Gate that records how often it was asked.
pub struct CountingGate {
    status: PermissionStatus,
    calls: std::sync::atomic::AtomicUsize,
}

impl CountingGate {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            status,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl PermissionGate for CountingGate {
    fn request_access(&self) -> PermissionStatus {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.status
    }
}

pub fn photo_request(bytes: &[u8]) -> PersistRequest {
    PersistRequest::new(bytes.to_vec(), "photo", FileType::new("jpg", "image/jpeg"))
}

pub fn photo_request_with(bytes: &[u8], policy: ConflictPolicy) -> PersistRequest {
    photo_request(bytes).with_policy(policy)
}
