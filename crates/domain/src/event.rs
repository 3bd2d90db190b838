use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rally_core::{AppError, AppResult, Principal};

use crate::geo::Coordinates;

/// Maximum accepted length for an event name.
pub const NAME_MAX_LENGTH: usize = 200;

/// Maximum accepted length for an event address.
pub const ADDRESS_MAX_LENGTH: usize = 300;

/// Unique identifier for an event record.
///
/// Identifiers are assigned exactly once, at insert time, by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses an identifier from its textual form.
    ///
    /// A malformed identifier is an [`AppError::InvalidId`], distinct
    /// from a well-formed identifier that matches no record.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::InvalidId(format!("malformed event id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated event name: non-empty, at most [`NAME_MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
    /// Creates a validated event name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "event name must not be empty".to_owned(),
            ));
        }

        if value.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "event name must not exceed {NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EventName> for String {
    fn from(value: EventName) -> Self {
        value.0
    }
}

/// Validated free-text postal address: non-empty, at most
/// [`ADDRESS_MAX_LENGTH`] characters. Display-only after geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAddress(String);

impl EventAddress {
    /// Creates a validated event address.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "event address must not be empty".to_owned(),
            ));
        }

        if value.chars().count() > ADDRESS_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "event address must not exceed {ADDRESS_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EventAddress> for String {
    fn from(value: EventAddress) -> Self {
        value.0
    }
}

/// A geolocated event owned by its organizer.
///
/// Invariant: `coordinates` are always the result of the most recent
/// successful geocode of `address`. The pair is only ever rewritten
/// together through [`Event::relocate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    name: EventName,
    occurs_at: DateTime<Utc>,
    address: EventAddress,
    coordinates: Coordinates,
    organizer: Principal,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Reconstructs an event from its persisted parts.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: EventId,
        name: EventName,
        occurs_at: DateTime<Utc>,
        address: EventAddress,
        coordinates: Coordinates,
        organizer: Principal,
        image_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            occurs_at,
            address,
            coordinates,
            organizer,
            image_url,
            created_at,
        }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &EventName {
        &self.name
    }

    /// Returns when the event takes place.
    #[must_use]
    pub fn occurs_at(&self) -> DateTime<Utc> {
        self.occurs_at
    }

    /// Returns the postal address.
    #[must_use]
    pub fn address(&self) -> &EventAddress {
        &self.address
    }

    /// Returns the geocoded coordinates.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Returns the principal that created the event. Never changes.
    #[must_use]
    pub fn organizer(&self) -> &Principal {
        &self.organizer
    }

    /// Returns the optional image URL.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the creation timestamp. Set once, never mutated.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies the non-address fields of a patch, returning the updated
    /// event. Absent fields are no-ops; `id`, `organizer`, `created_at`,
    /// `address` and `coordinates` are never touched here.
    #[must_use]
    pub fn apply_patch(&self, patch: &EventPatch) -> Self {
        let mut updated = self.clone();

        if let Some(name) = &patch.name {
            updated.name = name.clone();
        }

        if let Some(occurs_at) = patch.occurs_at {
            updated.occurs_at = occurs_at;
        }

        if let Some(image_url) = &patch.image_url {
            updated.image_url = Some(image_url.clone());
        }

        updated
    }

    /// Rewrites the address and its coordinates together, preserving the
    /// freshness invariant. Address and coordinates must come from the
    /// same successful geocode.
    #[must_use]
    pub fn relocate(&self, address: EventAddress, coordinates: Coordinates) -> Self {
        let mut updated = self.clone();
        updated.address = address;
        updated.coordinates = coordinates;
        updated
    }
}

/// An event awaiting insertion; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Validated event name.
    pub name: EventName,
    /// When the event takes place.
    pub occurs_at: DateTime<Utc>,
    /// Postal address the coordinates were geocoded from.
    pub address: EventAddress,
    /// Coordinates resolved by the geocoding gateway.
    pub coordinates: Coordinates,
    /// Principal creating the event.
    pub organizer: Principal,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Field-wise update to an event.
///
/// Fields are present-or-absent, not absent-or-null: an absent field is a
/// no-op, never a reset. The organizer is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    /// Replacement name, when present.
    pub name: Option<EventName>,
    /// Replacement event time, when present.
    pub occurs_at: Option<DateTime<Utc>>,
    /// Replacement address, when present. Requires a re-geocode before it
    /// takes effect.
    pub address: Option<EventAddress>,
    /// Replacement image URL, when present.
    pub image_url: Option<String>,
}
