use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage model of the hosting platform.
///
/// This is a platform fact queried once when an engine is built; it decides
/// which backend and which conflict resolver are used, never the file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageModel {
    /// Managed collections with a registry of entries (display name + relative path).
    Scoped,
    /// Literal directories the engine can probe and create files in.
    PathBased,
}

impl StorageModel {
    /// Placeholder path reported when a backend cannot resolve a real one.
    pub fn path_sentinel(&self) -> &'static str {
        match self {
            StorageModel::Scoped => "<scoped>",
            StorageModel::PathBased => "<path-based>",
        }
    }
}

impl FromStr for StorageModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scoped" | "registry" => Ok(StorageModel::Scoped),
            "path" | "path_based" | "path-based" | "legacy" => Ok(StorageModel::PathBased),
            _ => Err(anyhow::anyhow!("Invalid storage model: {}", s)),
        }
    }
}

impl Display for StorageModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageModel::Scoped => write!(f, "scoped"),
            StorageModel::PathBased => write!(f, "path_based"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_model() {
        assert_eq!("scoped".parse::<StorageModel>().unwrap(), StorageModel::Scoped);
        assert_eq!("PATH".parse::<StorageModel>().unwrap(), StorageModel::PathBased);
        assert_eq!("path-based".parse::<StorageModel>().unwrap(), StorageModel::PathBased);
        assert!("s3".parse::<StorageModel>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for model in [StorageModel::Scoped, StorageModel::PathBased] {
            assert_eq!(model.to_string().parse::<StorageModel>().unwrap(), model);
        }
    }
}
