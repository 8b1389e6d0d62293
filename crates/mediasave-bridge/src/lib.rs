//! Mediasave Bridge
//!
//! Typed call boundary in front of the engine: an instance registry handing
//! out integer ids, flat request/response structs with integer conflict
//! modes, and sync-or-callback save entry points.

pub mod registry;
pub mod request;
pub mod response;

pub use registry::SaverRegistry;
pub use request::SaveRequest;
pub use response::SaveResponse;
