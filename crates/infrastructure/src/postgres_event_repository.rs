use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use rally_application::EventRepository;
use rally_core::{AppError, AppResult, Principal};
use rally_domain::{
    BoundingBox, Coordinates, Event, EventAddress, EventId, EventName, NewEvent,
};

/// PostgreSQL-backed event repository.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    occurs_at: DateTime<Utc>,
    address: String,
    latitude: f64,
    longitude: f64,
    organizer: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl EventRow {
    /// Rebuilds the domain entity from a stored row. A row that fails
    /// domain validation indicates corruption, not caller error.
    fn into_event(self) -> AppResult<Event> {
        let remap = |error: AppError| {
            AppError::Internal(format!("stored event '{}' is invalid: {error}", self.id))
        };

        Ok(Event::from_parts(
            EventId::from_uuid(self.id),
            EventName::new(self.name.clone()).map_err(remap)?,
            self.occurs_at,
            EventAddress::new(self.address.clone()).map_err(remap)?,
            Coordinates::new(self.latitude, self.longitude).map_err(remap)?,
            Principal::new(self.organizer.clone()).map_err(remap)?,
            self.image_url.clone(),
            self.created_at,
        ))
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, occurs_at, address, latitude, longitude, organizer, image_url, created_at
    FROM events
"#;

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert(&self, event: NewEvent) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (name, occurs_at, address, latitude, longitude, organizer, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, occurs_at, address, latitude, longitude, organizer, image_url, created_at
            "#,
        )
        .bind(event.name.as_str())
        .bind(event.occurs_at)
        .bind(event.address.as_str())
        .bind(event.coordinates.latitude())
        .bind(event.coordinates.longitude())
        .bind(event.organizer.as_str())
        .bind(event.image_url.as_deref())
        .bind(event.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to insert event: {error}")))?;

        row.into_event()
    }

    async fn find(&self, id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Storage(format!("failed to load event: {error}")))?;

        row.map(EventRow::into_event).transpose()
    }

    async fn list_all(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Storage(format!("failed to list events: {error}")))?;

        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn list_by_organizer(&self, organizer: &Principal) -> AppResult<Vec<Event>> {
        let rows =
            sqlx::query_as::<_, EventRow>(&format!("{SELECT_COLUMNS} WHERE organizer = $1"))
                .bind(organizer.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Storage(format!("failed to list events by organizer: {error}"))
                })?;

        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn list_within(&self, bounding_box: &BoundingBox) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            {SELECT_COLUMNS}
            WHERE latitude >= $1 AND latitude <= $2
              AND longitude >= $3 AND longitude <= $4
            "#
        ))
        .bind(bounding_box.min_latitude())
        .bind(bounding_box.max_latitude())
        .bind(bounding_box.min_longitude())
        .bind(bounding_box.max_longitude())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!("failed to list events within bounding box: {error}"))
        })?;

        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn update(&self, event: &Event) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2,
                occurs_at = $3,
                address = $4,
                latitude = $5,
                longitude = $6,
                image_url = $7
            WHERE id = $1
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.name().as_str())
        .bind(event.occurs_at())
        .bind(event.address().as_str())
        .bind(event.coordinates().latitude())
        .bind(event.coordinates().longitude())
        .bind(event.image_url())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to update event: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "event '{}' not found",
                event.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: EventId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Storage(format!("failed to delete event: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
