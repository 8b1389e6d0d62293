use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// What to do when an entry with the requested name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Pick `name (1).ext`, `name (2).ext`, ...
    #[default]
    AutoRename,
    /// Replace the existing entry.
    Overwrite,
    /// Report `FILE_EXISTS`.
    Fail,
    /// Leave the decision to the backend; currently behaves like `Overwrite`
    /// on path-based storage and like `AutoRename` on scoped storage.
    Skip,
}

impl ConflictPolicy {
    /// Map the boundary's integer mode. Out-of-range values fall back to
    /// `AutoRename` instead of failing.
    pub fn from_mode(mode: i32) -> Self {
        match mode {
            1 => ConflictPolicy::Overwrite,
            2 => ConflictPolicy::Fail,
            3 => ConflictPolicy::Skip,
            _ => ConflictPolicy::AutoRename,
        }
    }

    pub fn as_mode(&self) -> i32 {
        match self {
            ConflictPolicy::AutoRename => 0,
            ConflictPolicy::Overwrite => 1,
            ConflictPolicy::Fail => 2,
            ConflictPolicy::Skip => 3,
        }
    }
}

impl From<i32> for ConflictPolicy {
    fn from(mode: i32) -> Self {
        ConflictPolicy::from_mode(mode)
    }
}

impl Display for ConflictPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConflictPolicy::AutoRename => write!(f, "auto_rename"),
            ConflictPolicy::Overwrite => write!(f, "overwrite"),
            ConflictPolicy::Fail => write!(f, "fail"),
            ConflictPolicy::Skip => write!(f, "skip"),
        }
    }
}
