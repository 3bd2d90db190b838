use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Maximum accepted length for a principal identifier (RFC 5321 bound).
pub const PRINCIPAL_MAX_LENGTH: usize = 254;

/// Authenticated identity attached to a request.
///
/// A principal is an email-like identifier produced by the external
/// authentication subsystem. Structural validation only: non-empty,
/// exactly one `@`, non-empty local part, domain with at least one `.`.
/// Comparison is case-insensitive because the value is lowercased on
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Creates a validated principal from an email-like identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "principal identifier must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.split('@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "principal identifier must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "principal local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "principal domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > PRINCIPAL_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "principal identifier must not exceed {PRINCIPAL_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
