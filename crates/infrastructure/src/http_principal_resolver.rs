use async_trait::async_trait;
use serde::Deserialize;

use rally_application::PrincipalResolver;
use rally_core::{AppError, AppResult, Principal};

/// Principal resolver backed by the external authentication subsystem's
/// token introspection endpoint.
///
/// The token stays opaque to this service: it is forwarded as a bearer
/// credential and the introspection response identifies the principal.
pub struct HttpPrincipalResolver {
    http_client: reqwest::Client,
    introspect_url: String,
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    email: String,
}

impl HttpPrincipalResolver {
    /// Creates a resolver calling the given introspection endpoint.
    #[must_use]
    pub fn new(http_client: reqwest::Client, introspect_url: String) -> Self {
        Self {
            http_client,
            introspect_url,
        }
    }
}

#[async_trait]
impl PrincipalResolver for HttpPrincipalResolver {
    async fn resolve(&self, token: &str) -> AppResult<Principal> {
        let response = self
            .http_client
            .get(self.introspect_url.as_str())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| {
                AppError::Unauthorized(format!("principal resolution failed: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized(
                "credentials were not accepted".to_owned(),
            ));
        }

        let identity: IntrospectionResponse = response.json().await.map_err(|error| {
            AppError::Unauthorized(format!("malformed introspection response: {error}"))
        })?;

        Principal::new(identity.email)
            .map_err(|error| AppError::Unauthorized(format!("invalid principal: {error}")))
    }
}
