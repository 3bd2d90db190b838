use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use rally_application::SessionLogRepository;
use rally_core::{AppError, AppResult, Principal};
use rally_domain::{NewSessionLog, SessionLog, SessionLogId};

/// PostgreSQL-backed append-only session log repository.
#[derive(Clone)]
pub struct PostgresSessionLogRepository {
    pool: PgPool,
}

impl PostgresSessionLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionLogRow {
    id: Uuid,
    timestamp: DateTime<Utc>,
    user_identifier: String,
    expires_at: DateTime<Utc>,
    token: String,
}

impl SessionLogRow {
    fn into_session_log(self) -> AppResult<SessionLog> {
        let user = Principal::new(self.user_identifier).map_err(|error| {
            AppError::Internal(format!("stored session log '{}' is invalid: {error}", self.id))
        })?;

        Ok(SessionLog::from_parts(
            SessionLogId::from_uuid(self.id),
            self.timestamp,
            user,
            self.expires_at,
            self.token,
        ))
    }
}

#[async_trait]
impl SessionLogRepository for PostgresSessionLogRepository {
    async fn append(&self, record: NewSessionLog) -> AppResult<SessionLog> {
        let row = sqlx::query_as::<_, SessionLogRow>(
            r#"
            INSERT INTO session_logs ("timestamp", user_identifier, expires_at, token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, "timestamp", user_identifier, expires_at, token
            "#,
        )
        .bind(record.timestamp)
        .bind(record.user.as_str())
        .bind(record.expires_at)
        .bind(record.token.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to append session log: {error}")))?;

        row.into_session_log()
    }

    async fn list_descending(&self) -> AppResult<Vec<SessionLog>> {
        let rows = sqlx::query_as::<_, SessionLogRow>(
            r#"
            SELECT id, "timestamp", user_identifier, expires_at, token
            FROM session_logs
            ORDER BY "timestamp" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list session logs: {error}")))?;

        rows.into_iter().map(SessionLogRow::into_session_log).collect()
    }
}
