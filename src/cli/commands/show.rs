//! Show command - print the cached sync response

use crate::cli::args::ShowArgs;
use crate::error::SyncStoreResult;
use crate::store::SyncResponseStore;
use crate::ui::{self, UiContext};

/// Execute the show command
pub async fn execute(args: ShowArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let Some(document) = store.current_response().await else {
        let ctx = UiContext::detect();
        ui::step_info(&ctx, "No cached sync response");
        return Ok(());
    };

    let json = if args.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    println!("{}", json);

    Ok(())
}
