use async_trait::async_trait;

use rally_core::{AppResult, Principal};

/// Port for the external authentication subsystem.
///
/// Given the opaque credential presented with a request, returns the
/// authenticated principal or fails with `AppError::Unauthorized`. Token
/// issuing and verification are not part of this system.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Resolves a bearer credential into the authenticated principal.
    async fn resolve(&self, token: &str) -> AppResult<Principal>;
}
