//! Room events as stored in a sync response

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `m.room.name` state event type
pub const ROOM_NAME: &str = "m.room.name";

/// `m.room.canonical_alias` state event type
pub const ROOM_CANONICAL_ALIAS: &str = "m.room.canonical_alias";

/// `m.room.aliases` state event type (legacy)
pub const ROOM_ALIASES: &str = "m.room.aliases";

/// A generic room event
///
/// Only the fields this crate inspects are typed. Everything else the server
/// sent is kept in `extra` so a cache round trip is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type, e.g. `m.room.name`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Free-form event content
    #[serde(default)]
    pub content: Map<String, Value>,

    /// Event id; stripped invite state omits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    /// Room id; sync payloads usually omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,

    /// State key for state events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    /// Sender user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Remaining fields (origin_server_ts, unsigned, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Create an event with the given type and content
    pub fn new(event_type: impl Into<String>, content: Value) -> Self {
        let content = match content {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            event_type: event_type.into(),
            content,
            event_id: None,
            room_id: None,
            state_key: None,
            sender: None,
            extra: Map::new(),
        }
    }

    /// Get a string field from the content
    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }

    /// Get the first string element of an array field from the content
    pub fn content_first_str(&self, key: &str) -> Option<&str> {
        self.content
            .get(key)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_str)
    }
}
