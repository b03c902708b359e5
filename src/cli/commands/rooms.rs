//! Rooms command - list cached rooms

use crate::cli::args::{OutputFormat, RoomsArgs};
use crate::error::SyncStoreResult;
use crate::model::{Membership, SyncResponse};
use crate::store::SyncResponseStore;
use crate::summary::derive_display_name;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RoomRow {
    room_id: String,
    membership: Membership,
    events: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Execute the rooms command
pub async fn execute(args: RoomsArgs, store: &SyncResponseStore) -> SyncStoreResult<()> {
    let rows = store
        .current_response()
        .await
        .map(|document| collect_rows(&document))
        .unwrap_or_default();

    if rows.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cached rooms");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}\t{}", row.room_id, row.membership);
            }
        }
    }

    Ok(())
}

fn collect_rows(document: &SyncResponse) -> Vec<RoomRow> {
    let rooms = &document.rooms;
    let mut rows = Vec::with_capacity(rooms.len());

    for (room_id, room) in &rooms.join {
        rows.push(RoomRow {
            room_id: room_id.clone(),
            membership: Membership::Join,
            events: room.events().count(),
            name: None,
        });
    }
    for (room_id, room) in &rooms.invite {
        rows.push(RoomRow {
            room_id: room_id.clone(),
            membership: Membership::Invite,
            events: room.events().len(),
            name: derive_display_name(room.events()),
        });
    }
    for (room_id, room) in &rooms.leave {
        rows.push(RoomRow {
            room_id: room_id.clone(),
            membership: Membership::Leave,
            events: room.events().count(),
            name: None,
        });
    }

    rows
}

fn print_table(rows: &[RoomRow]) {
    println!(
        "{:<40} {:<10} {:>7}  {}",
        style("ROOM").bold(),
        style("MEMBERSHIP").bold(),
        style("EVENTS").bold(),
        style("NAME").bold()
    );
    println!("{}", "-".repeat(72));

    for row in rows {
        let label = style(row.membership.to_string());
        let membership = match row.membership {
            Membership::Join => label.green(),
            Membership::Invite => label.yellow(),
            Membership::Leave => label.dim(),
        };
        println!(
            "{:<40} {:<10} {:>7}  {}",
            row.room_id,
            membership,
            row.events,
            row.name.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("{} room(s)", rows.len());
}
