//! Event lookup within a cached sync response

use crate::model::{Event, SyncResponse};

/// Find an event by id within a room
///
/// Categories are searched in the order join, invite, leave. Joined and left
/// rooms are scanned state, then timeline, then account data; invited rooms
/// only their invite state. The first match is returned with `room_id` set to
/// the queried room, since sync payloads do not reliably embed it.
pub fn find_event(document: &SyncResponse, event_id: &str, room_id: &str) -> Option<Event> {
    let rooms = &document.rooms;

    let joined = rooms.join.get(room_id).into_iter().flat_map(|room| room.events());
    let invited = rooms.invite.get(room_id).into_iter().flat_map(|room| room.events());
    let left = rooms.leave.get(room_id).into_iter().flat_map(|room| room.events());

    joined
        .chain(invited)
        .chain(left)
        .find(|event| event.event_id.as_deref() == Some(event_id))
        .map(|event| Event {
            room_id: Some(room_id.to_string()),
            ..event.clone()
        })
}
