//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod event;
mod geo;
mod session_log;

pub use event::{
    ADDRESS_MAX_LENGTH, Event, EventAddress, EventId, EventName, EventPatch, NAME_MAX_LENGTH,
    NewEvent,
};
pub use geo::{BoundingBox, Coordinates, SEARCH_HALF_WIDTH_DEG};
pub use session_log::{NewSessionLog, SessionLog, SessionLogId};
