//! Sync response store
//!
//! Binds a cache location to a user and exposes the cache contract: open,
//! current response, merge, clear, event lookup and invite summaries.

pub mod facade;
pub mod paths;

pub use facade::SyncResponseStore;
pub use paths::CacheRoot;
