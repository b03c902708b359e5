//! Clear command - delete the cached sync response

use crate::cli::args::ClearArgs;
use crate::error::SyncStoreResult;
use crate::store::SyncResponseStore;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub async fn execute(args: ClearArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let user = super::user_label(store);

    let confirmed = ui::confirm(
        &ctx,
        &format!("Delete the cached sync response for {}?", user),
        false,
    )
    .await?;

    if !confirmed {
        ui::step_warn_hint(&ctx, "Cache not cleared", "Use --yes to skip confirmation");
        return Ok(());
    }

    store.clear().await;
    ui::step_ok(&ctx, &format!("Cleared sync response cache for {}", user));
    Ok(())
}
