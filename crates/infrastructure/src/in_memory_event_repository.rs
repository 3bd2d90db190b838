use async_trait::async_trait;
use tokio::sync::RwLock;

use rally_application::EventRepository;
use rally_core::{AppError, AppResult, Principal};
use rally_domain::{BoundingBox, Event, EventId, NewEvent};

/// In-memory event repository.
///
/// Insertion order is the store iteration order, which makes the
/// proximity-search tie-break deterministic in tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> AppResult<Event> {
        let stored = Event::from_parts(
            EventId::new(),
            event.name,
            event.occurs_at,
            event.address,
            event.coordinates,
            event.organizer,
            event.image_url,
            event.created_at,
        );

        self.events.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: EventId) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|event| event.id() == id)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn list_by_organizer(&self, organizer: &Principal) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.organizer() == organizer)
            .cloned()
            .collect())
    }

    async fn list_within(&self, bounding_box: &BoundingBox) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| bounding_box.contains(event.coordinates()))
            .cloned()
            .collect())
    }

    async fn update(&self, event: &Event) -> AppResult<()> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|stored| stored.id() == event.id()) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "event '{}' not found",
                event.id()
            ))),
        }
    }

    async fn delete(&self, id: EventId) -> AppResult<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| event.id() != id);
        Ok(events.len() < before)
    }
}
