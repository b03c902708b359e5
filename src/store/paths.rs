//! Cache location resolution

use crate::config::schema::StorageConfig;
use crate::config::ConfigManager;
use crate::error::{SyncStoreError, SyncStoreResult};
use std::path::{Path, PathBuf};

/// Directory under the cache root holding per-user caches
pub const STORE_DIR: &str = "SyncResponse";

/// File name of the cached document
pub const STORE_FILE: &str = "syncResponse";

/// Root directory under which sync responses are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRoot(PathBuf);

impl CacheRoot {
    /// Use an explicit directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Resolve from storage settings
    ///
    /// The shared app container wins, then the cache dir override, then the
    /// platform cache directory.
    pub fn from_config(storage: &StorageConfig) -> Self {
        let path = storage
            .app_group_dir
            .clone()
            .or_else(|| storage.cache_dir.clone())
            .unwrap_or_else(ConfigManager::default_cache_root);
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/SyncResponse/<user_id>/syncResponse`
    pub fn document_path(&self, user_id: &str) -> SyncStoreResult<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.0.join(STORE_DIR).join(user_id).join(STORE_FILE))
    }
}

/// Check that a user id is usable as a single path component
pub fn validate_user_id(user_id: &str) -> SyncStoreResult<()> {
    if user_id.trim().is_empty() {
        return Err(SyncStoreError::MissingUserId);
    }
    if user_id == "." || user_id == ".." {
        return Err(SyncStoreError::invalid_user(user_id, "not a file name"));
    }
    if user_id.contains(['/', '\\', '\0']) {
        return Err(SyncStoreError::invalid_user(
            user_id,
            "contains a path separator",
        ));
    }
    Ok(())
}
