//! Configuration schema for syncstore
//!
//! Configuration is stored at `~/.config/syncstore/config.toml`

use crate::merge::ListMergePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Accepted values of `general.log_format`
pub const LOG_FORMATS: &[&str] = &["text", "json"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Whose cache to open
    pub identity: IdentityConfig,

    /// Where caches live
    pub storage: StorageConfig,

    /// How incoming sync responses are merged
    pub merge: MergeConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Identity settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// User id owning the cache (e.g. `@alice:example.org`)
    pub user_id: Option<String>,
}

/// Storage location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Shared application container; takes precedence when set
    pub app_group_dir: Option<PathBuf>,

    /// Cache directory override (default: platform cache dir)
    pub cache_dir: Option<PathBuf>,
}

/// Merge settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// "append-events" (default) or "replace"
    pub list_policy: ListMergePolicy,
}
