use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rally_application::ProximitySearchOutcome;
use rally_domain::{Coordinates, Event};

/// Incoming payload for event creation.
///
/// Coordinates are intentionally not part of the payload: they are
/// derived from `address` by the geocoding gateway, and unknown fields
/// in the request body are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub occurs_at: DateTime<Utc>,
    pub address: String,
    pub image_url: Option<String>,
}

/// Incoming payload for an event update. Absent fields are left
/// untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub occurs_at: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Query string for proximity search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub address: String,
}

/// API representation of an event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub occurs_at: DateTime<Utc>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub organizer: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().as_str().to_owned(),
            occurs_at: event.occurs_at(),
            address: event.address().as_str().to_owned(),
            latitude: event.coordinates().latitude(),
            longitude: event.coordinates().longitude(),
            organizer: event.organizer().as_str().to_owned(),
            image_url: event.image_url().map(str::to_owned),
            created_at: event.created_at(),
        }
    }
}

/// API representation of a coordinate pair.
#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for CoordinatesResponse {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
        }
    }
}

/// Proximity-search payload: the matches plus the point that was
/// searched from.
#[derive(Debug, Serialize)]
pub struct ProximitySearchResponse {
    pub matches: Vec<EventResponse>,
    pub resolved_center: CoordinatesResponse,
}

impl From<ProximitySearchOutcome> for ProximitySearchResponse {
    fn from(outcome: ProximitySearchOutcome) -> Self {
        Self {
            matches: outcome.matches.into_iter().map(EventResponse::from).collect(),
            resolved_center: CoordinatesResponse::from(outcome.resolved_center),
        }
    }
}

/// Payload answering an image upload.
#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
}
