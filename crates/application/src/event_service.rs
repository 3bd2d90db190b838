#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;

use rally_core::{AppError, AppResult, Principal};
use rally_domain::{
    BoundingBox, Event, EventAddress, EventId, EventName, EventPatch, NewEvent,
    SEARCH_HALF_WIDTH_DEG,
};

use crate::event_ports::{
    CreateEventInput, EventRepository, GeocodingGateway, ProximitySearchOutcome, UpdateEventInput,
};

/// Application service orchestrating the event lifecycle: creation with
/// address-to-coordinate resolution, ownership-enforced mutation and
/// deletion, and proximity search.
///
/// Stateless between calls; the repository is the only shared mutable
/// resource.
#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
    geocoder: Arc<dyn GeocodingGateway>,
}

impl EventService {
    /// Creates an event service from its capability ports.
    #[must_use]
    pub fn new(repository: Arc<dyn EventRepository>, geocoder: Arc<dyn GeocodingGateway>) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    /// Creates a new event owned by the acting principal.
    ///
    /// The address is resolved through the geocoding gateway first; on
    /// failure no record is inserted. Coordinates always come from the
    /// gateway, never from the caller.
    pub async fn create(&self, actor: &Principal, input: CreateEventInput) -> AppResult<Event> {
        let name = EventName::new(input.name)?;
        let address = EventAddress::new(input.address)?;

        let coordinates = self.geocoder.resolve(address.as_str()).await?;

        self.repository
            .insert(NewEvent {
                name,
                occurs_at: input.occurs_at,
                address,
                coordinates,
                organizer: actor.clone(),
                image_url: input.image_url,
                created_at: Utc::now(),
            })
            .await
    }

    /// Returns one event by identifier. Unrestricted read.
    pub async fn get(&self, id: EventId) -> AppResult<Event> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event '{id}' not found")))
    }

    /// Returns every stored event, unordered. Unrestricted read.
    pub async fn list_all(&self) -> AppResult<Vec<Event>> {
        self.repository.list_all().await
    }

    /// Returns the events owned by the acting principal, unordered.
    pub async fn list_mine(&self, actor: &Principal) -> AppResult<Vec<Event>> {
        self.repository.list_by_organizer(actor).await
    }

    /// Applies a field-wise update to an event owned by the actor.
    ///
    /// Ownership is checked after existence and before any write,
    /// regardless of which fields the patch touches. When the patch
    /// carries a new address it is re-geocoded; on success the address
    /// and coordinates are rewritten together, on failure the address
    /// change is dropped while other patch fields still apply.
    pub async fn update(
        &self,
        actor: &Principal,
        id: EventId,
        input: UpdateEventInput,
    ) -> AppResult<Event> {
        let event = self.get(id).await?;
        Self::ensure_organizer(&event, actor)?;

        let patch = Self::validate_patch(input)?;
        let mut updated = event.apply_patch(&patch);

        if let Some(address) = patch.address {
            match self.geocoder.resolve(address.as_str()).await {
                Ok(coordinates) => {
                    updated = updated.relocate(address, coordinates);
                }
                Err(error) => {
                    tracing::warn!(
                        event_id = %id,
                        address = address.as_str(),
                        %error,
                        "re-geocoding failed; dropping address change from update"
                    );
                }
            }
        }

        self.repository.update(&updated).await?;
        Ok(updated)
    }

    /// Deletes an event owned by the actor. A second delete of the same
    /// identifier is `NotFound`, not success.
    pub async fn delete(&self, actor: &Principal, id: EventId) -> AppResult<()> {
        let event = self.get(id).await?;
        Self::ensure_organizer(&event, actor)?;

        let removed = self.repository.delete(id).await?;
        if !removed {
            return Err(AppError::NotFound(format!("event '{id}' not found")));
        }

        Ok(())
    }

    /// Finds the events near an address.
    ///
    /// The address is geocoded into a center point, a square box of
    /// half-width [`SEARCH_HALF_WIDTH_DEG`] degrees is laid around it,
    /// and every event inside the box is returned sorted by ascending
    /// `occurs_at` (ties keep store order).
    pub async fn search_nearby(&self, address: &str) -> AppResult<ProximitySearchOutcome> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "search address must not be empty".to_owned(),
            ));
        }

        let resolved_center = self.geocoder.resolve(trimmed).await?;
        let bounding_box = BoundingBox::around(resolved_center, SEARCH_HALF_WIDTH_DEG);

        let mut matches = self.repository.list_within(&bounding_box).await?;
        matches.sort_by_key(Event::occurs_at);

        Ok(ProximitySearchOutcome {
            matches,
            resolved_center,
        })
    }

    /// The single authorization rule for all mutating operations: only
    /// the original organizer may mutate an event.
    fn ensure_organizer(event: &Event, actor: &Principal) -> AppResult<()> {
        if event.organizer() != actor {
            return Err(AppError::Forbidden(format!(
                "principal '{actor}' is not the organizer of event '{}'",
                event.id()
            )));
        }

        Ok(())
    }

    /// Validates raw update inputs into a typed patch. Field constraints
    /// are enforced before any geocoding call or write.
    fn validate_patch(input: UpdateEventInput) -> AppResult<EventPatch> {
        Ok(EventPatch {
            name: input.name.map(EventName::new).transpose()?,
            occurs_at: input.occurs_at,
            address: input.address.map(EventAddress::new).transpose()?,
            image_url: input.image_url,
        })
    }
}
