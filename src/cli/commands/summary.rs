//! Summary command - derived name of an invited room

use crate::cli::args::{OutputFormat, SummaryArgs};
use crate::error::{SyncStoreError, SyncStoreResult};
use crate::store::SyncResponseStore;

/// Execute the summary command
pub async fn execute(args: SummaryArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let summary = store
        .room_summary(&args.room_id)
        .await
        .ok_or_else(|| SyncStoreError::SummaryNotFound(args.room_id.clone()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => println!("{:<40} {}", summary.room_id, summary.display_name),
        OutputFormat::Plain => println!("{}", summary.display_name),
    }

    Ok(())
}
