//! Capability validator contract.
//!
//! The platform decides whether a format can be encoded on this device. The
//! engine only consults it for formats outside its always-supported sets.

use crate::models::FileType;

/// Answer from a [`CapabilityValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityVerdict {
    Supported,
    /// Not writable here; the string explains why.
    Unsupported(String),
}

impl CapabilityVerdict {
    pub fn is_supported(&self) -> bool {
        matches!(self, CapabilityVerdict::Supported)
    }
}

/// Decides whether the current device/OS can write a given format.
///
/// Implementations must be pure with respect to a call: the same file type
/// yields the same verdict for the lifetime of the process.
pub trait CapabilityValidator: Send + Sync {
    fn check(&self, file_type: &FileType) -> CapabilityVerdict;
}

/// Validator that accepts everything. Used for hosts with no encoder gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl CapabilityValidator for AcceptAllValidator {
    fn check(&self, _file_type: &FileType) -> CapabilityVerdict {
        CapabilityVerdict::Supported
    }
}
