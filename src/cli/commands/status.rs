//! Status command - overview of the cache

use crate::error::SyncStoreResult;
use crate::store::SyncResponseStore;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(store: &SyncResponseStore) -> SyncStoreResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Sync response cache");

    ui::key_value(&ctx, "User", &super::user_label(store));
    if let Some(path) = store.path() {
        ui::key_value(&ctx, "Path", &path.display().to_string());
    }
    ui::key_value(&ctx, "Merge policy", &store.policy().to_string());

    let Some(document) = store.current_response().await else {
        ui::key_value_status(&ctx, "Cached", "no", false);
        return Ok(());
    };

    ui::key_value_status(&ctx, "Cached", "yes", true);
    ui::key_value(&ctx, "Size", &format!("{} bytes", document.to_json()?.len()));
    ui::key_value(
        &ctx,
        "Next batch",
        document.next_batch.as_deref().unwrap_or("-"),
    );
    ui::key_value(&ctx, "Joined rooms", &document.rooms.join.len().to_string());
    ui::key_value(&ctx, "Invited rooms", &document.rooms.invite.len().to_string());
    ui::key_value(&ctx, "Left rooms", &document.rooms.leave.len().to_string());

    Ok(())
}
