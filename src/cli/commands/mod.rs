//! CLI command implementations

pub mod clear;
pub mod config;
pub mod event;
pub mod merge;
pub mod rooms;
pub mod show;
pub mod status;
pub mod summary;

pub use clear::execute as clear;
pub use config::execute as config;
pub use event::execute as event;
pub use merge::execute as merge;
pub use rooms::execute as rooms;
pub use show::execute as show;
pub use status::execute as status;
pub use summary::execute as summary;

use crate::config::Config;
use crate::error::{SyncStoreError, SyncStoreResult};
use crate::store::SyncResponseStore;

/// Open the store for the user given on the command line or in config
pub fn open_store(user: Option<&str>, config: &Config) -> SyncStoreResult<SyncResponseStore> {
    let user_id = user
        .or(config.identity.user_id.as_deref())
        .ok_or(SyncStoreError::MissingUserId)?;

    let mut store = SyncResponseStore::from_config(config);
    store.open(user_id)?;
    Ok(store)
}

/// User id of an opened store, for messages
fn user_label(store: &SyncResponseStore) -> String {
    store.user_id().unwrap_or("unknown user").to_string()
}
