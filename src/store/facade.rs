//! Per-user sync response cache

use super::paths::CacheRoot;
use crate::config::Config;
use crate::error::SyncStoreResult;
use crate::lookup;
use crate::merge::{merge_documents, ListMergePolicy};
use crate::model::{Event, SyncResponse};
use crate::storage::StorageAccessor;
use crate::summary::RoomSummary;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Cache of the latest sync response for one user
///
/// Starts unopened; every operation other than [`open`](Self::open) is a
/// no-op until a user is bound. Failures after that are logged and read as
/// an empty cache, so callers can always fall back to a full sync.
pub struct SyncResponseStore {
    cache_root: CacheRoot,
    policy: ListMergePolicy,
    opened: Option<OpenedStore>,
}

struct OpenedStore {
    user_id: String,
    accessor: StorageAccessor,
    /// Held across read-merge-write so concurrent merges do not lose updates
    merge_lock: Mutex<()>,
}

impl SyncResponseStore {
    /// Create an unopened store
    pub fn new(cache_root: CacheRoot, policy: ListMergePolicy) -> Self {
        Self {
            cache_root,
            policy,
            opened: None,
        }
    }

    /// Create an unopened store from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CacheRoot::from_config(&config.storage),
            config.merge.list_policy,
        )
    }

    /// Bind the store to a user
    ///
    /// Fails without panicking on an empty or unusable user id, or when no
    /// Tokio runtime is running. On failure the store stays as it was.
    pub fn open(&mut self, user_id: &str) -> SyncStoreResult<()> {
        let path = self.cache_root.document_path(user_id)?;
        let accessor = StorageAccessor::spawn(path)?;
        accessor.initialize();

        info!("Opened sync response cache at {}", accessor.path().display());
        self.opened = Some(OpenedStore {
            user_id: user_id.to_string(),
            accessor,
            merge_lock: Mutex::new(()),
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.opened.is_some()
    }

    /// User the store is bound to
    pub fn user_id(&self) -> Option<&str> {
        self.opened.as_ref().map(|o| o.user_id.as_str())
    }

    /// Path of the cached document
    pub fn path(&self) -> Option<&Path> {
        self.opened.as_ref().map(|o| o.accessor.path())
    }

    pub fn policy(&self) -> ListMergePolicy {
        self.policy
    }

    /// The cached sync response, if any
    pub async fn current_response(&self) -> Option<SyncResponse> {
        let opened = self.opened.as_ref()?;
        let text = opened.accessor.read().await?;

        match SyncResponse::from_json(&text) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Ignoring unreadable sync response cache: {}", e);
                None
            }
        }
    }

    /// Merge an incoming sync response into the cache
    ///
    /// The write is queued, not awaited. Reads issued afterwards by the same
    /// caller observe it.
    pub async fn merge(&self, incoming: Option<SyncResponse>) {
        let (Some(opened), Some(incoming)) = (self.opened.as_ref(), incoming) else {
            return;
        };

        let _guard = opened.merge_lock.lock().await;
        let current = self.current_response().await;

        let merged = match merge_documents(current.as_ref(), incoming, self.policy) {
            Ok(merged) => merged,
            Err(e) => {
                warn!("Failed to merge sync response: {}", e);
                return;
            }
        };

        match merged.to_json() {
            Ok(json) => {
                debug!("Queued sync response with {} rooms", merged.rooms.len());
                opened.accessor.write(json);
            }
            Err(e) => warn!("Failed to encode sync response: {}", e),
        }
    }

    /// Remove the cached document
    ///
    /// Waits for an in-flight merge, so a merge that started first cannot
    /// restore the document after this returns.
    pub async fn clear(&self) {
        if let Some(opened) = &self.opened {
            let _guard = opened.merge_lock.lock().await;
            opened.accessor.delete().await;
            info!("Cleared sync response cache for {}", opened.user_id);
        }
    }

    /// Wait until queued writes have reached disk
    pub async fn flush(&self) {
        if let Some(opened) = &self.opened {
            opened.accessor.flush().await;
        }
    }

    /// Find an event by id within a room
    pub async fn find_event(&self, event_id: &str, room_id: &str) -> Option<Event> {
        let document = self.current_response().await?;
        lookup::find_event(&document, event_id, room_id)
    }

    /// Summary of an invited room
    ///
    /// Joined and left rooms are not summarized here.
    pub async fn room_summary(&self, room_id: &str) -> Option<RoomSummary> {
        let document = self.current_response().await?;
        let room = document.rooms.invite.get(room_id)?;
        RoomSummary::from_invite_state(room_id, room.events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncStoreError;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn doc(value: serde_json::Value) -> SyncResponse {
        serde_json::from_value(value).unwrap()
    }

    fn opened_store(dir: &TempDir) -> SyncResponseStore {
        let mut store =
            SyncResponseStore::new(CacheRoot::new(dir.path()), ListMergePolicy::AppendEvents);
        store.open("@alice:example.org").unwrap();
        store
    }

    fn joined(room: &str, ids: &[&str]) -> SyncResponse {
        let events: Vec<_> = ids
            .iter()
            .map(|id| json!({"type": "m.room.message", "event_id": id, "content": {}}))
            .collect();
        doc(json!({"next_batch": ids.last(), "rooms": {"join": {room: {"timeline": {"events": events}}}}}))
    }

    #[tokio::test]
    async fn unopened_store_is_inert() {
        let dir = TempDir::new().unwrap();
        let store = SyncResponseStore::new(CacheRoot::new(dir.path()), ListMergePolicy::Replace);

        store.merge(Some(joined("!r", &["$1"]))).await;
        store.clear().await;
        store.flush().await;

        assert!(!store.is_open());
        assert!(store.current_response().await.is_none());
        assert!(store.find_event("$1", "!r").await.is_none());
        assert!(store.room_summary("!r").await.is_none());
        assert!(!dir.path().join("SyncResponse").exists());
    }

    #[tokio::test]
    async fn open_rejects_empty_user() {
        let dir = TempDir::new().unwrap();
        let mut store =
            SyncResponseStore::new(CacheRoot::new(dir.path()), ListMergePolicy::AppendEvents);

        assert!(matches!(store.open(""), Err(SyncStoreError::MissingUserId)));
        assert!(!store.is_open());
    }

    #[tokio::test]
    async fn cold_start_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        assert!(store.current_response().await.is_none());
        assert!(store.find_event("$1", "!r").await.is_none());
        assert!(store.room_summary("!r").await.is_none());
    }

    #[tokio::test]
    async fn open_creates_user_directory() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);
        store.flush().await;

        assert!(dir
            .path()
            .join("SyncResponse")
            .join("@alice:example.org")
            .is_dir());
        assert_eq!(store.user_id(), Some("@alice:example.org"));
    }

    #[tokio::test]
    async fn round_trip() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);
        let document = joined("!r", &["$1", "$2"]);

        store.merge(Some(document.clone())).await;
        assert_eq!(store.current_response().await, Some(document));
    }

    #[tokio::test]
    async fn merge_none_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        store.merge(None).await;
        store.flush().await;
        assert!(store.current_response().await.is_none());
    }

    #[tokio::test]
    async fn read_after_write_sees_every_merge() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        for i in 0..20 {
            let id = format!("${}", i);
            store.merge(Some(joined("!r", &[id.as_str()]))).await;

            let current = store.current_response().await.unwrap();
            assert_eq!(current.next_batch.as_deref(), Some(id.as_str()));
            assert!(store.find_event(&id, "!r").await.is_some());
        }
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        store.clear().await;
        assert!(store.current_response().await.is_none());

        store.merge(Some(joined("!r", &["$1"]))).await;
        store.clear().await;
        assert!(store.current_response().await.is_none());

        store.clear().await;
        assert!(store.current_response().await.is_none());
    }

    #[tokio::test]
    async fn merge_keeps_history_across_payloads() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        store.merge(Some(joined("!r", &["$1"]))).await;
        store.merge(Some(joined("!r", &["$2"]))).await;

        assert!(store.find_event("$1", "!r").await.is_some());
        assert!(store.find_event("$2", "!r").await.is_some());
    }

    #[tokio::test]
    async fn replace_policy_drops_history() {
        let dir = TempDir::new().unwrap();
        let mut store =
            SyncResponseStore::new(CacheRoot::new(dir.path()), ListMergePolicy::Replace);
        store.open("@alice:example.org").unwrap();

        store.merge(Some(joined("!r", &["$1"]))).await;
        store.merge(Some(joined("!r", &["$2"]))).await;

        assert!(store.find_event("$1", "!r").await.is_none());
        assert!(store.find_event("$2", "!r").await.is_some());
    }

    #[tokio::test]
    async fn lookup_prefers_join_over_leave() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        store
            .merge(Some(doc(json!({"rooms": {
                "join": {"!r": {"timeline": {"events": [
                    {"type": "m.room.message", "event_id": "$e", "content": {"body": "joined"}}
                ]}}},
                "leave": {"!r": {"timeline": {"events": [
                    {"type": "m.room.message", "event_id": "$e", "content": {"body": "left"}}
                ]}}}
            }}))))
            .await;

        let event = store.find_event("$e", "!r").await.unwrap();
        assert_eq!(event.content_str("body"), Some("joined"));
        assert_eq!(event.room_id.as_deref(), Some("!r"));
    }

    #[tokio::test]
    async fn summary_only_for_invites() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);

        store
            .merge(Some(doc(json!({"rooms": {
                "join": {"!j": {"state": {"events": [
                    {"type": "m.room.name", "event_id": "$n", "content": {"name": "Joined"}}
                ]}}},
                "invite": {"!i": {"invite_state": {"events": [
                    {"type": "m.room.canonical_alias", "content": {"alias": "#a:x"}},
                    {"type": "m.room.name", "content": {"name": "Foo"}}
                ]}}}
            }}))))
            .await;

        let summary = store.room_summary("!i").await.unwrap();
        assert_eq!(summary.display_name, "Foo");
        assert!(store.room_summary("!j").await.is_none());
    }

    #[tokio::test]
    async fn summary_follows_alias_change() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);
        let invite = |alias: &str| {
            doc(json!({"rooms": {"invite": {"!i": {"invite_state": {"events": [
                {"type": "m.room.canonical_alias", "state_key": "", "content": {"alias": alias}}
            ]}}}}}))
        };

        store.merge(Some(invite("#old:x"))).await;
        store.merge(Some(invite("#new:x"))).await;

        let summary = store.room_summary("!i").await.unwrap();
        assert_eq!(summary.display_name, "#new:x");
    }

    #[tokio::test]
    async fn clear_waits_for_inflight_merge() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(opened_store(&dir));
        store.merge(Some(joined("!r", &["$1"]))).await;

        let guard = store.opened.as_ref().unwrap().merge_lock.lock().await;
        let clearing = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.clear().await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!clearing.is_finished());
        assert!(store.current_response().await.is_some());

        drop(guard);
        clearing.await.unwrap();
        assert!(store.current_response().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = opened_store(&dir);
        store.flush().await;

        std::fs::write(store.path().unwrap(), "{not json").unwrap();
        assert!(store.current_response().await.is_none());

        // A merge over a corrupt cache starts fresh
        let document = joined("!r", &["$1"]);
        store.merge(Some(document.clone())).await;
        assert_eq!(store.current_response().await, Some(document));
    }

    #[tokio::test]
    async fn merge_output_is_byte_identical() {
        let first_dir = TempDir::new().unwrap();
        let second_dir = TempDir::new().unwrap();
        let a = joined("!a", &["$1"]);
        let b = doc(json!({"rooms": {"invite": {"!i": {"invite_state": {"events": [
            {"type": "m.room.name", "content": {"name": "Foo"}}
        ]}}}}}));

        let mut written = Vec::new();
        for dir in [&first_dir, &second_dir] {
            let store = opened_store(dir);
            store.merge(Some(a.clone())).await;
            store.merge(Some(b.clone())).await;
            store.flush().await;
            written.push(std::fs::read(store.path().unwrap()).unwrap());
        }

        assert_eq!(written[0], written[1]);
    }

    #[tokio::test]
    async fn reopen_switches_user() {
        let dir = TempDir::new().unwrap();
        let mut store = opened_store(&dir);
        store.merge(Some(joined("!r", &["$1"]))).await;
        store.flush().await;

        store.open("@bob:example.org").unwrap();
        assert!(store.current_response().await.is_none());

        store.open("@alice:example.org").unwrap();
        assert!(store.current_response().await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_merges_lose_nothing() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(opened_store(&dir));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let room = format!("!room{}", i);
                store.merge(Some(joined(&room, &["$e"]))).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let current = store.current_response().await.unwrap();
        assert_eq!(current.rooms.join.len(), 16);
    }
}
