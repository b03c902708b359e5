//! Sync response document model

pub mod document;
pub mod event;

pub use document::{EventList, InvitedRoomSync, Membership, RoomSync, Rooms, SyncResponse};
pub use event::Event;
