//! Merge command - fold a sync response into the cache

use crate::cli::args::MergeArgs;
use crate::error::{SyncStoreError, SyncStoreResult};
use crate::model::SyncResponse;
use crate::store::SyncResponseStore;
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Execute the merge command
pub async fn execute(args: MergeArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let text = read_input(&args.input).await?;
    let incoming = SyncResponse::from_json(&text)?;
    let rooms = incoming.rooms.len();
    debug!("Parsed sync response with {} rooms", rooms);

    store.merge(Some(incoming)).await;
    store.flush().await;

    let ctx = UiContext::detect();
    ui::step_ok(
        &ctx,
        &format!(
            "Merged {} room(s) into the cache for {}",
            rooms,
            super::user_label(store)
        ),
    );
    Ok(())
}

async fn read_input(input: &Path) -> SyncStoreResult<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| SyncStoreError::io("reading sync response from stdin", e))?;
        return Ok(text);
    }

    fs::read_to_string(input)
        .await
        .map_err(|e| SyncStoreError::io(format!("reading {}", input.display()), e))
}
