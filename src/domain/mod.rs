//! Domain layer: activity events, owned entities, and the event bus.
//!
//! This module holds the server-side model: typed identifiers, the
//! immutable [`ActivityEvent`] record and its tags, the [`OwnedEntity`]
//! catalog record, the clock used to stamp writes, and the broadcast
//! [`EventBus`] that feeds live subscribers.

pub mod activity_event;
pub mod clock;
pub mod event_bus;
pub mod ids;
pub mod owned_entity;

pub use activity_event::{
    Action, ActivityEvent, ClientContext, Device, EventType, RecordActivity, UNKNOWN_LOCATION,
    sort_newest_first,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use event_bus::EventBus;
pub use ids::{EventId, SubjectId, UserId};
pub use owned_entity::{EntityKind, EntityPatch, NewEntity, OwnedEntity};
