//! Event command - look up a cached event

use crate::cli::args::EventArgs;
use crate::error::{SyncStoreError, SyncStoreResult};
use crate::store::SyncResponseStore;

/// Execute the event command
pub async fn execute(args: EventArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let event = store
        .find_event(&args.event_id, &args.room_id)
        .await
        .ok_or_else(|| SyncStoreError::EventNotFound {
            event_id: args.event_id.clone(),
            room_id: args.room_id.clone(),
        })?;

    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
