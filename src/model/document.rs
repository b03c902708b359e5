//! Sync response document schema
//!
//! ```text
//! { next_batch, rooms: { join:   { <room>: { state, timeline, account_data } },
//!                        invite: { <room>: { invite_state } },
//!                        leave:  { <room>: { state, timeline, account_data } } } }
//! ```
//!
//! Maps are `BTreeMap`s and `serde_json::Map` is ordered by key, so encoding
//! the same document twice always yields the same bytes.

use super::event::Event;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Membership category of a room within a sync response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Join,
    Invite,
    Leave,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Join => "join",
            Self::Invite => "invite",
            Self::Leave => "leave",
        };
        write!(f, "{}", name)
    }
}

/// Root of a cached sync response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Continuation token for the next incremental sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_batch: Option<String>,

    /// Rooms by membership category
    #[serde(default)]
    pub rooms: Rooms,

    /// Top-level sections this crate does not inspect
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SyncResponse {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Encode the document as compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Rooms keyed by room id, per membership category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rooms {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub join: BTreeMap<String, RoomSync>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub invite: BTreeMap<String, InvitedRoomSync>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub leave: BTreeMap<String, RoomSync>,

    /// Other categories (e.g. knock)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rooms {
    /// Total number of rooms across all categories
    pub fn len(&self) -> usize {
        self.join.len() + self.invite.len() + self.leave.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-room subtree for joined and left rooms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSync {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<EventList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<EventList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_data: Option<EventList>,

    /// ephemeral, unread_notifications, summary, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoomSync {
    /// State, then timeline, then account-data events
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        [&self.state, &self.timeline, &self.account_data]
            .into_iter()
            .flatten()
            .flat_map(|list| list.events.iter())
    }
}

/// Per-room subtree for invited rooms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitedRoomSync {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_state: Option<EventList>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvitedRoomSync {
    /// Invite-state events, in order
    pub fn events(&self) -> &[Event] {
        self.invite_state
            .as_ref()
            .map(|list| list.events.as_slice())
            .unwrap_or_default()
    }
}

/// A `{ "events": [...] }` container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub events: Vec<Event>,

    /// limited, prev_batch, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
