//! Configuration module
//!
//! Engine configuration is read from the environment (and an optional `.env`
//! file). Every value has a default so a bare environment yields a working
//! scoped store under `./mediasave-data`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{CHUNK_SIZE, DEFAULT_PLATFORM_VERSION, MAX_RENAME_ATTEMPTS};
use crate::permission_gate::PermissionStatus;
use crate::storage_types::StorageModel;

const DEFAULT_STORAGE_ROOT: &str = "./mediasave-data";

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_model: StorageModel,
    pub storage_root: PathBuf,
    pub chunk_size_bytes: usize,
    pub max_rename_attempts: u32,
    /// Platform version used by the minimum-version gate of newer image formats.
    pub platform_version: u32,
    /// Answer given by the static permission gate.
    pub permission: PermissionStatus,
    /// Encoder mime types available on this host. `None` uses the built-in set.
    pub encoders: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_model: StorageModel::Scoped,
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            chunk_size_bytes: CHUNK_SIZE,
            max_rename_attempts: MAX_RENAME_ATTEMPTS,
            platform_version: DEFAULT_PLATFORM_VERSION,
            permission: PermissionStatus::Full,
            encoders: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let storage_model = parse_var("MEDIASAVE_STORAGE_MODEL")?.unwrap_or(defaults.storage_model);
        let storage_root = env::var("MEDIASAVE_STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_root);
        let chunk_size_bytes =
            parse_var("MEDIASAVE_CHUNK_SIZE_BYTES")?.unwrap_or(defaults.chunk_size_bytes);
        let max_rename_attempts =
            parse_var("MEDIASAVE_MAX_RENAME_ATTEMPTS")?.unwrap_or(defaults.max_rename_attempts);
        let platform_version =
            parse_var("MEDIASAVE_PLATFORM_VERSION")?.unwrap_or(defaults.platform_version);
        let permission = parse_var("MEDIASAVE_PERMISSION")?.unwrap_or(defaults.permission);

        let encoders = env::var("MEDIASAVE_ENCODERS").ok().map(|value| {
            value
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        let config = Config {
            storage_model,
            storage_root,
            chunk_size_bytes,
            max_rename_attempts,
            platform_version,
            permission,
            encoders,
        };
        config.validate()?;

        tracing::debug!(
            storage_model = %config.storage_model,
            storage_root = %config.storage_root.display(),
            chunk_size_bytes = config.chunk_size_bytes,
            max_rename_attempts = config.max_rename_attempts,
            platform_version = config.platform_version,
            permission = %config.permission,
            "Loaded mediasave configuration"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.chunk_size_bytes == 0 {
            return Err(anyhow::anyhow!("MEDIASAVE_CHUNK_SIZE_BYTES must be greater than 0"));
        }
        if self.max_rename_attempts == 0 {
            return Err(anyhow::anyhow!(
                "MEDIASAVE_MAX_RENAME_ATTEMPTS must be greater than 0"
            ));
        }
        if self.storage_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("MEDIASAVE_STORAGE_ROOT cannot be empty"));
        }
        Ok(())
    }

    pub fn with_storage_root(mut self, storage_root: impl Into<PathBuf>) -> Self {
        self.storage_root = storage_root.into();
        self
    }

    pub fn with_storage_model(mut self, storage_model: StorageModel) -> Self {
        self.storage_model = storage_model;
        self
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", name, value, e)),
        _ => Ok(None),
    }
}
