//! Configuration loading for syncstore
//!
//! A missing file means defaults. A file that parses but names an unknown
//! log format is rejected with its path, like a syntax error. Relative
//! storage directories are taken relative to the file that names them.

pub mod schema;

pub use schema::{Config, LOG_FORMATS};

use crate::error::{SyncStoreError, SyncStoreResult};
use crate::storage::atomic::atomic_write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes the config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config location
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for an explicit file (`--config` / `SYNCSTORE_CONFIG`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/syncstore/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("syncstore")
            .join("config.toml")
    }

    /// `<cache dir>/syncstore`, used when no storage directory is configured
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("syncstore")
    }

    /// Load the config file, or defaults when there is none
    pub async fn load(&self) -> SyncStoreResult<Config> {
        let exists = fs::try_exists(&self.config_path).await.map_err(|e| {
            SyncStoreError::io(format!("checking {}", self.config_path.display()), e)
        })?;
        if !exists {
            debug!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load and check a specific config file
    pub async fn load_from_file(&self, path: &Path) -> SyncStoreResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            SyncStoreError::io(format!("reading config from {}", path.display()), e)
        })?;

        let invalid = |reason: String| SyncStoreError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let mut config: Config = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        if !LOG_FORMATS.contains(&config.general.log_format.as_str()) {
            return Err(invalid(format!(
                "general.log_format must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                config.general.log_format
            )));
        }

        if let Some(base) = path.parent() {
            anchor_storage_dirs(&mut config, base);
        }
        Ok(config)
    }

    /// Write the config file atomically, creating its directory
    pub async fn save(&self, config: &Config) -> SyncStoreResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncStoreError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        atomic_write(&self.config_path, content.as_bytes())
            .await
            .map_err(|e| {
                SyncStoreError::io(
                    format!("writing config to {}", self.config_path.display()),
                    e,
                )
            })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Make relative storage directories relative to `base`
fn anchor_storage_dirs(config: &mut Config, base: &Path) {
    let storage = &mut config.storage;
    for dir in [&mut storage.app_group_dir, &mut storage.cache_dir]
        .into_iter()
        .flatten()
    {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}
