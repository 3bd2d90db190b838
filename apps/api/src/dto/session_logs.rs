use chrono::{DateTime, Utc};
use serde::Serialize;

use rally_domain::SessionLog;

/// API representation of one login audit record.
#[derive(Debug, Serialize)]
pub struct SessionLogResponse {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub expires_at: DateTime<Utc>,
    pub token: String,
}

impl From<SessionLog> for SessionLogResponse {
    fn from(record: SessionLog) -> Self {
        Self {
            id: record.id().to_string(),
            timestamp: record.timestamp(),
            user: record.user().as_str().to_owned(),
            expires_at: record.expires_at(),
            token: record.token().to_owned(),
        }
    }
}
