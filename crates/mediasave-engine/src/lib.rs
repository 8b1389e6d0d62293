//! Mediasave Engine
//!
//! The file-persistence decision engine: classifies the incoming type,
//! checks that the host can write it, picks the destination name and drives
//! the storage backend through create, write and finalize.

pub mod capability;
pub mod classifier;
pub mod orchestrator;
pub mod profile;

pub use capability::{check_capability, CodecTableValidator, EncoderSource, StaticEncoderSource};
pub use classifier::classify;
pub use orchestrator::FileSaver;
pub use profile::CategoryProfile;
