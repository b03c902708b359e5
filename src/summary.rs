//! Display-name derivation for invited rooms

use crate::model::event::{ROOM_ALIASES, ROOM_CANONICAL_ALIAS, ROOM_NAME};
use crate::model::Event;
use serde::{Deserialize, Serialize};

/// Summary of an invited room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Room id
    pub room_id: String,

    /// Derived display name
    pub display_name: String,
}

impl RoomSummary {
    /// Summarize a room from its invite-state events
    pub fn from_invite_state(room_id: &str, events: &[Event]) -> Option<Self> {
        derive_display_name(events).map(|display_name| Self {
            room_id: room_id.to_string(),
            display_name,
        })
    }
}

/// Derive a display name from ordered invite-state events
///
/// `m.room.name` always sets the name, so the last one wins and it beats any
/// alias regardless of position. `m.room.canonical_alias` (alias, else first
/// alt alias) and `m.room.aliases` (first alias) only apply while no name is
/// set. A name event without a string `name` clears the name.
pub fn derive_display_name(events: &[Event]) -> Option<String> {
    let mut name: Option<String> = None;

    for event in events {
        match event.event_type.as_str() {
            ROOM_NAME => {
                name = event.content_str("name").map(str::to_string);
            }
            ROOM_CANONICAL_ALIAS if name.is_none() => {
                name = event
                    .content_str("alias")
                    .or_else(|| event.content_first_str("alt_aliases"))
                    .map(str::to_string);
            }
            ROOM_ALIASES if name.is_none() => {
                name = event.content_first_str("aliases").map(str::to_string);
            }
            _ => {}
        }
    }

    name
}
