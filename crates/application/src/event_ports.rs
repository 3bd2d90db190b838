use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rally_core::{AppResult, Principal};
use rally_domain::{BoundingBox, Coordinates, Event, EventId, NewEvent};

/// Repository port for event records.
///
/// The store is an abstract document collection keyed by opaque
/// identifiers and queryable over the indexed `organizer`, `latitude`
/// and `longitude` fields.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts a new event, assigning its identifier. Exactly one insert
    /// per call.
    async fn insert(&self, event: NewEvent) -> AppResult<Event>;

    /// Returns one event by identifier, when present.
    async fn find(&self, id: EventId) -> AppResult<Option<Event>>;

    /// Returns every stored event, unordered.
    async fn list_all(&self) -> AppResult<Vec<Event>>;

    /// Returns the events owned by a principal, unordered.
    async fn list_by_organizer(&self, organizer: &Principal) -> AppResult<Vec<Event>>;

    /// Returns the events whose coordinates fall within the box, in
    /// store iteration order. All four range predicates are inclusive
    /// and conjunctive.
    async fn list_within(&self, bounding_box: &BoundingBox) -> AppResult<Vec<Event>>;

    /// Persists the current state of an existing event.
    async fn update(&self, event: &Event) -> AppResult<()>;

    /// Deletes one event. Returns whether a record was removed.
    async fn delete(&self, id: EventId) -> AppResult<bool>;
}

/// Port for the external geocoding capability.
///
/// Non-deterministic, network-bound, rate- and availability-limited.
/// Implementations must bound every call with a timeout so a slow
/// resolution fails instead of hanging. Any failure (unresolvable
/// address, transport error, timeout) surfaces as
/// `AppError::Geocoding` carrying the offending address.
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    /// Resolves a free-text address into coordinates.
    async fn resolve(&self, address: &str) -> AppResult<Coordinates>;
}

/// Inputs for event creation. Coordinates are deliberately absent:
/// they are derived from `address` by the geocoding gateway, never
/// supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventInput {
    /// Event name, 1–200 characters.
    pub name: String,
    /// When the event takes place.
    pub occurs_at: DateTime<Utc>,
    /// Free-text postal address, at most 300 characters.
    pub address: String,
    /// Optional image URL.
    pub image_url: Option<String>,
}

/// Inputs for an event update. Absent fields are no-ops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEventInput {
    /// Replacement name, when present.
    pub name: Option<String>,
    /// Replacement event time, when present.
    pub occurs_at: Option<DateTime<Utc>>,
    /// Replacement address, when present; triggers a re-geocode.
    pub address: Option<String>,
    /// Replacement image URL, when present.
    pub image_url: Option<String>,
}

/// Result of a proximity search: the matches sorted by ascending
/// `occurs_at` together with the coordinate the search was centered on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySearchOutcome {
    /// Matching events, soonest first.
    pub matches: Vec<Event>,
    /// The geocoded center of the search.
    pub resolved_center: Coordinates,
}
