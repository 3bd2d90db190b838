use std::sync::Arc;

use async_trait::async_trait;

use rally_core::AppResult;
use rally_domain::{NewSessionLog, SessionLog};

/// Repository port for the append-only session audit trail.
#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// Appends one login record, assigning its identifier. Records are
    /// never updated or deleted.
    async fn append(&self, record: NewSessionLog) -> AppResult<SessionLog>;

    /// Returns every record in descending `timestamp` order.
    async fn list_descending(&self) -> AppResult<Vec<SessionLog>>;
}

/// Application service for the session audit trail.
///
/// Records are written by the login flow and readable by any
/// authenticated principal; there is no per-user filtering.
#[derive(Clone)]
pub struct SessionLogService {
    repository: Arc<dyn SessionLogRepository>,
}

impl SessionLogService {
    /// Creates a session log service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn SessionLogRepository>) -> Self {
        Self { repository }
    }

    /// Appends the audit record for one login.
    pub async fn record_login(&self, record: NewSessionLog) -> AppResult<SessionLog> {
        self.repository.append(record).await
    }

    /// Lists every login record, most recent first.
    pub async fn list(&self) -> AppResult<Vec<SessionLog>> {
        self.repository.list_descending().await
    }
}
