//! Per-call value types. None of them outlive a single persist operation.

mod conflict;
mod file_type;
mod request;
mod result;
mod target;

pub use conflict::ConflictPolicy;
pub use file_type::{FileCategory, FileType};
pub use request::{compose_file_name, PersistRequest};
pub use result::PersistResult;
pub use target::TargetLocation;
