use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use rally_core::{AppError, AppResult, Principal};
use rally_domain::{BoundingBox, Coordinates, Event, EventId, NewEvent};

use crate::event_ports::{CreateEventInput, EventRepository, GeocodingGateway, UpdateEventInput};

use super::EventService;

#[derive(Default)]
struct FakeEventRepository {
    events: Mutex<Vec<Event>>,
}

impl FakeEventRepository {
    async fn stored(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventRepository for FakeEventRepository {
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
        self.events.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: EventId) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .find(|event| event.id() == id)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Event>> {
        Ok(self.events.lock().await.clone())
    }

    async fn list_by_organizer(&self, organizer: &Principal) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| event.organizer() == organizer)
            .cloned()
            .collect())
    }

    async fn list_within(&self, bounding_box: &BoundingBox) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| bounding_box.contains(event.coordinates()))
            .cloned()
            .collect())
    }

    async fn update(&self, event: &Event) -> AppResult<()> {
        let mut events = self.events.lock().await;
        match events.iter_mut().find(|stored| stored.id() == event.id()) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("event '{}'", event.id()))),
        }
    }

    async fn delete(&self, id: EventId) -> AppResult<bool> {
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|event| event.id() != id);
        Ok(events.len() < before)
    }
}

struct FakeGeocoder {
    known: HashMap<String, Coordinates>,
}

impl FakeGeocoder {
    fn with(entries: &[(&str, f64, f64)]) -> Self {
        let known = entries
            .iter()
            .map(|(address, latitude, longitude)| {
                (
                    (*address).to_owned(),
                    coordinates(*latitude, *longitude),
                )
            })
            .collect();
        Self { known }
    }
}

#[async_trait]
impl GeocodingGateway for FakeGeocoder {
    async fn resolve(&self, address: &str) -> AppResult<Coordinates> {
        self.known
            .get(address)
            .copied()
            .ok_or_else(|| AppError::Geocoding(address.to_owned()))
    }
}

fn coordinates(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap_or_else(|_| panic!("test coordinates"))
}

fn principal(value: &str) -> Principal {
    Principal::new(value).unwrap_or_else(|_| panic!("test principal"))
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 20, hour, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("test timestamp"))
}

fn create_input(name: &str, address: &str) -> CreateEventInput {
    CreateEventInput {
        name: name.to_owned(),
        occurs_at: at(20),
        address: address.to_owned(),
        image_url: None,
    }
}

fn service_with(
    geocoder: FakeGeocoder,
) -> (EventService, Arc<FakeEventRepository>) {
    let repository = Arc::new(FakeEventRepository::default());
    let service = EventService::new(repository.clone(), Arc::new(geocoder));
    (service, repository)
}

#[tokio::test]
async fn create_uses_gateway_coordinates() {
    let geocoder = FakeGeocoder::with(&[("Av. Corrientes 1234", -34.6, -58.4)]);
    let (service, _) = service_with(geocoder);

    let event = service
        .create(&principal("a@x.com"), create_input("Concert", "Av. Corrientes 1234"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    assert_eq!(event.coordinates(), coordinates(-34.6, -58.4));
    assert_eq!(event.organizer(), &principal("a@x.com"));
    assert_eq!(event.name().as_str(), "Concert");
}

#[tokio::test]
async fn create_with_unresolvable_address_inserts_nothing() {
    let (service, repository) = service_with(FakeGeocoder::with(&[]));

    let result = service
        .create(&principal("a@x.com"), create_input("Concert", "Nowhere"))
        .await;

    assert!(matches!(result, Err(AppError::Geocoding(address)) if address == "Nowhere"));
    assert!(repository.stored().await.is_empty());
}

#[tokio::test]
async fn create_rejects_invalid_name_before_geocoding() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, repository) = service_with(geocoder);

    let result = service
        .create(&principal("a@x.com"), create_input("", "Somewhere"))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.stored().await.is_empty());
}

#[tokio::test]
async fn update_by_non_organizer_is_forbidden_and_leaves_event_unchanged() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, repository) = service_with(geocoder);

    let event = service
        .create(&principal("a@x.com"), create_input("Concert", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let result = service
        .update(
            &principal("b@x.com"),
            event.id(),
            UpdateEventInput {
                name: Some("Hijacked".to_owned()),
                ..UpdateEventInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(repository.stored().await, vec![event]);
}

#[tokio::test]
async fn update_with_resolvable_address_rewrites_address_and_coordinates_together() {
    let geocoder = FakeGeocoder::with(&[("Old place", 1.0, 1.0), ("New place", 2.0, 3.0)]);
    let (service, _) = service_with(geocoder);
    let owner = principal("a@x.com");

    let event = service
        .create(&owner, create_input("Concert", "Old place"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let updated = service
        .update(
            &owner,
            event.id(),
            UpdateEventInput {
                address: Some("New place".to_owned()),
                ..UpdateEventInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| panic!("update should succeed"));

    assert_eq!(updated.address().as_str(), "New place");
    assert_eq!(updated.coordinates(), coordinates(2.0, 3.0));
}

#[tokio::test]
async fn update_with_unresolvable_address_drops_the_address_change_only() {
    let geocoder = FakeGeocoder::with(&[("Old place", 1.0, 1.0)]);
    let (service, repository) = service_with(geocoder);
    let owner = principal("a@x.com");

    let event = service
        .create(&owner, create_input("Concert", "Old place"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let updated = service
        .update(
            &owner,
            event.id(),
            UpdateEventInput {
                name: Some("Renamed".to_owned()),
                address: Some("Unresolvable".to_owned()),
                ..UpdateEventInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| panic!("update should degrade gracefully"));

    // Name applies; address and coordinates stay as geocoded before.
    assert_eq!(updated.name().as_str(), "Renamed");
    assert_eq!(updated.address().as_str(), "Old place");
    assert_eq!(updated.coordinates(), coordinates(1.0, 1.0));
    assert_eq!(repository.stored().await, vec![updated]);
}

#[tokio::test]
async fn update_with_name_only_leaves_other_fields_unchanged() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, _) = service_with(geocoder);
    let owner = principal("a@x.com");

    let event = service
        .create(&owner, create_input("Concert", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let updated = service
        .update(
            &owner,
            event.id(),
            UpdateEventInput {
                name: Some("Festival".to_owned()),
                ..UpdateEventInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| panic!("update should succeed"));

    assert_eq!(updated.name().as_str(), "Festival");
    assert_eq!(updated.occurs_at(), event.occurs_at());
    assert_eq!(updated.address(), event.address());
    assert_eq!(updated.coordinates(), event.coordinates());
    assert_eq!(updated.organizer(), event.organizer());
    assert_eq!(updated.created_at(), event.created_at());
}

#[tokio::test]
async fn update_of_missing_event_is_not_found() {
    let (service, _) = service_with(FakeGeocoder::with(&[]));

    let result = service
        .update(&principal("a@x.com"), EventId::new(), UpdateEventInput::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_then_get_is_not_found_and_second_delete_is_not_found() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, _) = service_with(geocoder);
    let owner = principal("a@x.com");

    let event = service
        .create(&owner, create_input("Concert", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    service
        .delete(&owner, event.id())
        .await
        .unwrap_or_else(|_| panic!("first delete should succeed"));

    assert!(matches!(
        service.get(event.id()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&owner, event.id()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_by_non_organizer_is_forbidden() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, repository) = service_with(geocoder);

    let event = service
        .create(&principal("a@x.com"), create_input("Concert", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let result = service.delete(&principal("b@x.com"), event.id()).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(repository.stored().await.len(), 1);
}

#[tokio::test]
async fn search_returns_exactly_the_events_inside_the_box() {
    let geocoder = FakeGeocoder::with(&[
        ("Center", 0.0, 0.0),
        ("On north edge", 0.2, 0.0),
        ("On west edge", 0.0, -0.2),
        ("Just outside north", 0.21, 0.0),
        ("Far away", 40.0, 40.0),
    ]);
    let (service, _) = service_with(geocoder);
    let owner = principal("a@x.com");

    for address in [
        "On north edge",
        "On west edge",
        "Just outside north",
        "Far away",
    ] {
        service
            .create(&owner, create_input(address, address))
            .await
            .unwrap_or_else(|_| panic!("create should succeed"));
    }

    let outcome = service
        .search_nearby("Center")
        .await
        .unwrap_or_else(|_| panic!("search should succeed"));

    let names: Vec<&str> = outcome
        .matches
        .iter()
        .map(|event| event.name().as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"On north edge"));
    assert!(names.contains(&"On west edge"));
    assert_eq!(outcome.resolved_center, coordinates(0.0, 0.0));
}

#[tokio::test]
async fn search_sorts_matches_by_ascending_occurs_at() {
    let geocoder = FakeGeocoder::with(&[("Center", 0.0, 0.0)]);
    let (service, _) = service_with(geocoder);
    let owner = principal("a@x.com");

    for (name, hour) in [("Third", 22), ("First", 18), ("Second", 20)] {
        service
            .create(
                &owner,
                CreateEventInput {
                    name: name.to_owned(),
                    occurs_at: at(hour),
                    address: "Center".to_owned(),
                    image_url: None,
                },
            )
            .await
            .unwrap_or_else(|_| panic!("create should succeed"));
    }

    let outcome = service
        .search_nearby("Center")
        .await
        .unwrap_or_else(|_| panic!("search should succeed"));

    let names: Vec<&str> = outcome
        .matches
        .iter()
        .map(|event| event.name().as_str())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn search_with_unresolvable_address_fails_without_matches() {
    let (service, _) = service_with(FakeGeocoder::with(&[]));

    let result = service.search_nearby("Nowhere").await;
    assert!(matches!(result, Err(AppError::Geocoding(address)) if address == "Nowhere"));
}

#[tokio::test]
async fn nearby_search_scenario_across_two_addresses() {
    let geocoder = FakeGeocoder::with(&[
        ("Av. Corrientes 1234", -34.6, -58.4),
        ("Obelisco", -34.5, -58.3),
        ("Null Island", 0.0, 0.0),
    ]);
    let (service, _) = service_with(geocoder);

    let event = service
        .create(
            &principal("a@x.com"),
            create_input("Concert", "Av. Corrientes 1234"),
        )
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let near = service
        .search_nearby("Obelisco")
        .await
        .unwrap_or_else(|_| panic!("search should succeed"));
    assert_eq!(near.matches, vec![event]);

    let far = service
        .search_nearby("Null Island")
        .await
        .unwrap_or_else(|_| panic!("search should succeed"));
    assert!(far.matches.is_empty());
}

#[tokio::test]
async fn list_mine_returns_only_the_actors_events() {
    let geocoder = FakeGeocoder::with(&[("Somewhere", 1.0, 1.0)]);
    let (service, _) = service_with(geocoder);

    service
        .create(&principal("a@x.com"), create_input("Mine", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));
    service
        .create(&principal("b@x.com"), create_input("Theirs", "Somewhere"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let mine = service
        .list_mine(&principal("a@x.com"))
        .await
        .unwrap_or_else(|_| panic!("list should succeed"));

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name().as_str(), "Mine");
}
