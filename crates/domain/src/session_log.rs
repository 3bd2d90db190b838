use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rally_core::{AppError, AppResult, Principal};

/// Unique identifier for a session log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionLogId(Uuid);

impl SessionLogId {
    /// Creates a new random session log identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a session log identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionLogId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Append-only audit record of one login session.
///
/// Written by the login flow, never updated or deleted. Listed in
/// descending `timestamp` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    id: SessionLogId,
    timestamp: DateTime<Utc>,
    user: Principal,
    expires_at: DateTime<Utc>,
    token: String,
}

impl SessionLog {
    /// Reconstructs a session log record from its persisted parts.
    #[must_use]
    pub fn from_parts(
        id: SessionLogId,
        timestamp: DateTime<Utc>,
        user: Principal,
        expires_at: DateTime<Utc>,
        token: String,
    ) -> Self {
        Self {
            id,
            timestamp,
            user,
            expires_at,
            token,
        }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> SessionLogId {
        self.id
    }

    /// Returns the login timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the principal that logged in.
    #[must_use]
    pub fn user(&self) -> &Principal {
        &self.user
    }

    /// Returns when the issued credential expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the opaque credential reference.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }
}

/// A session log record awaiting insertion; the store assigns the
/// identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionLog {
    /// Login timestamp.
    pub timestamp: DateTime<Utc>,
    /// Principal that logged in.
    pub user: Principal,
    /// Credential expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Opaque credential reference.
    pub token: String,
}

impl NewSessionLog {
    /// Creates a record for a login happening now, rejecting empty tokens.
    pub fn at_login(user: Principal, expires_at: DateTime<Utc>, token: String) -> AppResult<Self> {
        if token.trim().is_empty() {
            return Err(AppError::Validation(
                "session token must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            timestamp: Utc::now(),
            user,
            expires_at,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use rally_core::Principal;

    use super::NewSessionLog;

    #[test]
    fn empty_token_is_rejected() {
        let user = Principal::new("a@x.com").unwrap_or_else(|_| panic!("test"));
        let result = NewSessionLog::at_login(user, Utc::now() + Duration::hours(1), "  ".to_owned());
        assert!(result.is_err());
    }

    #[test]
    fn login_record_is_stamped_with_current_time() {
        let user = Principal::new("a@x.com").unwrap_or_else(|_| panic!("test"));
        let before = Utc::now();
        let record =
            NewSessionLog::at_login(user, Utc::now() + Duration::hours(1), "token".to_owned())
                .unwrap_or_else(|_| panic!("test"));
        assert!(record.timestamp >= before);
        assert!(record.timestamp <= Utc::now());
    }
}
