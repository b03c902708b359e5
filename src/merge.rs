//! Merging an incremental sync response into the cached one
//!
//! Both documents are merged as JSON trees. For a key present on both sides,
//! two objects merge recursively and anything else is replaced by the incoming
//! value. Keys present on one side pass through.
//!
//! Arrays follow [`ListMergePolicy`]. Incremental payloads only carry events
//! newer than the previous `next_batch`, so the default policy appends room
//! event lists instead of replacing them; replacing would drop the cached
//! history of every room that shows up again.

use crate::error::SyncStoreResult;
use crate::model::SyncResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How arrays are combined when both documents carry one at the same path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListMergePolicy {
    /// Room event lists are concatenated and de-duplicated; other arrays are replaced
    #[default]
    AppendEvents,
    /// Every array is replaced wholesale
    Replace,
}

impl fmt::Display for ListMergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AppendEvents => "append-events",
            Self::Replace => "replace",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ListMergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append-events" => Ok(Self::AppendEvents),
            "replace" => Ok(Self::Replace),
            other => Err(format!(
                "unknown list policy '{}', expected append-events or replace",
                other
            )),
        }
    }
}

/// Merge `incoming` into `current`
///
/// With no current document the incoming one is returned unchanged.
pub fn merge_documents(
    current: Option<&SyncResponse>,
    incoming: SyncResponse,
    policy: ListMergePolicy,
) -> SyncStoreResult<SyncResponse> {
    let Some(current) = current else {
        return Ok(incoming);
    };

    let mut tree = serde_json::to_value(current)?;
    let incoming = serde_json::to_value(incoming)?;
    merge_values(&mut tree, incoming, policy);

    Ok(serde_json::from_value(tree)?)
}

/// Merge two JSON trees in place
pub fn merge_values(current: &mut Value, incoming: Value, policy: ListMergePolicy) {
    let mut path = Vec::new();
    merge_at(&mut path, current, incoming, policy);
}

fn merge_at(path: &mut Vec<String>, current: &mut Value, incoming: Value, policy: ListMergePolicy) {
    match (current, incoming) {
        (Value::Object(current), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match current.get_mut(&key) {
                    Some(existing) => {
                        path.push(key);
                        merge_at(path, existing, value, policy);
                        path.pop();
                    }
                    None => {
                        current.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(current), Value::Array(incoming))
            if policy == ListMergePolicy::AppendEvents =>
        {
            match event_list_kind(path) {
                Some(kind) => append_events(current, incoming, kind),
                None => *current = incoming,
            }
        }
        (current, incoming) => *current = incoming,
    }
}

/// Room event lists that are appended rather than replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventListKind {
    /// `state` and `invite_state`: one current event per `(type, state_key)`
    State,
    /// `timeline` and `account_data`
    Stream,
}

/// Kind of `rooms.{join,leave}.<room>.{state,timeline,account_data}.events`
/// or `rooms.invite.<room>.invite_state.events`; `None` for any other path
fn event_list_kind(path: &[String]) -> Option<EventListKind> {
    let [rooms, category, _room, section, events] = path else {
        return None;
    };
    if rooms != "rooms" || events != "events" {
        return None;
    }

    match (category.as_str(), section.as_str()) {
        ("join" | "leave", "state") | ("invite", "invite_state") => Some(EventListKind::State),
        ("join" | "leave", "timeline" | "account_data") => Some(EventListKind::Stream),
        _ => None,
    }
}

/// Identity of an event within one list
#[derive(Debug, PartialEq, Eq, Hash)]
enum EventKey {
    Id(String),
    State { event_type: String, state_key: String },
    Body(String),
}

impl EventKey {
    fn of(event: &Value, kind: EventListKind) -> Self {
        if let Some(id) = event_id(event) {
            return Self::Id(id.to_string());
        }

        if kind == EventListKind::State {
            let event_type = event.get("type").and_then(Value::as_str);
            let state_key = event.get("state_key").and_then(Value::as_str);
            if let (Some(event_type), Some(state_key)) = (event_type, state_key) {
                return Self::State {
                    event_type: event_type.to_string(),
                    state_key: state_key.to_string(),
                };
            }
        }

        // Object keys are sorted, so equal events encode identically
        Self::Body(event.to_string())
    }
}

/// Concatenate event lists, keeping existing positions
///
/// An incoming event with a known `event_id` replaces the cached copy in
/// place. In state lists an id-less event replaces the cached event with the
/// same `(type, state_key)`. Any other id-less event is skipped when an
/// identical one is cached.
fn append_events(current: &mut Vec<Value>, incoming: Vec<Value>, kind: EventListKind) {
    let mut index: HashMap<EventKey, usize> = HashMap::with_capacity(current.len());
    for (position, event) in current.iter().enumerate() {
        index.entry(EventKey::of(event, kind)).or_insert(position);
    }

    for event in incoming {
        let key = EventKey::of(&event, kind);
        match index.get(&key) {
            Some(&position) => current[position] = event,
            None => {
                index.insert(key, current.len());
                current.push(event);
            }
        }
    }
}

fn event_id(event: &Value) -> Option<&str> {
    event.get("event_id").and_then(Value::as_str)
}
