use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use rally_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the request's bearer credential into a principal and makes
/// it available to handlers as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("bearer credential required".to_owned()))?
        .to_owned();

    let principal = state.principal_resolver.resolve(&token).await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
