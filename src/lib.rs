//! syncstore - Local sync response cache
//!
//! Persists the latest incremental sync payload of a messaging client so a
//! session can resume after restart without a full refresh. One serialized
//! worker owns each user's file; merges fold new payloads into the cached
//! one; lookups find events and derive invited-room names.

pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod merge;
pub mod model;
pub mod storage;
pub mod store;
pub mod summary;
pub mod ui;

pub use error::{SyncStoreError, SyncStoreResult};
pub use merge::ListMergePolicy;
pub use model::{Event, SyncResponse};
pub use store::{CacheRoot, SyncResponseStore};
pub use summary::RoomSummary;
