//! Shared primitives for all Rust crates in Rally.

#![forbid(unsafe_code)]

/// Authenticated principal identity shared across services.
pub mod principal;

use thiserror::Error;

pub use principal::Principal;

/// Result type used across Rally crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed resource identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Address could not be resolved to coordinates, or the geocoding
    /// gateway was unreachable. Carries the offending address.
    #[error("geocoding failed for address '{0}'")]
    Geocoding(String),

    /// Principal resolution failed or no credentials were presented.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Principal is authenticated but is not the owner of the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Downstream persistence or file-storage failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
