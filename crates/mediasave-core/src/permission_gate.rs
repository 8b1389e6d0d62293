//! Permission gate trait.
//!
//! On platforms where writing to public collections needs user consent, the
//! gate asks for it and blocks until the user answers. Bridging the platform's
//! asynchronous prompt into this synchronous call is the implementor's job.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Result of a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Read and write access to the collection.
    Full,
    /// Add-only access: entries can be created but existing ones cannot be
    /// looked up, so neither conflict probing nor sub-collections are available.
    Limited,
    Denied,
}

impl FromStr for PermissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "authorized" => Ok(PermissionStatus::Full),
            "limited" | "add_only" => Ok(PermissionStatus::Limited),
            "denied" => Ok(PermissionStatus::Denied),
            _ => Err(anyhow::anyhow!("Invalid permission status: {}", s)),
        }
    }
}

impl Display for PermissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PermissionStatus::Full => write!(f, "full"),
            PermissionStatus::Limited => write!(f, "limited"),
            PermissionStatus::Denied => write!(f, "denied"),
        }
    }
}

/// Gate consulted once per persist call, before any storage access.
pub trait PermissionGate: Send + Sync {
    /// Returns the current consent, prompting the user if it is undetermined.
    fn request_access(&self) -> PermissionStatus;
}

/// Gate with a fixed answer. Desktop hosts use `Full`.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissionGate(pub PermissionStatus);

impl Default for StaticPermissionGate {
    fn default() -> Self {
        StaticPermissionGate(PermissionStatus::Full)
    }
}

impl PermissionGate for StaticPermissionGate {
    fn request_access(&self) -> PermissionStatus {
        self.0
    }
}
