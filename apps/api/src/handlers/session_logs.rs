use axum::Json;
use axum::extract::{Extension, State};

use rally_core::Principal;

use crate::dto::SessionLogResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_session_logs_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<Principal>,
) -> ApiResult<Json<Vec<SessionLogResponse>>> {
    let records = state
        .session_log_service
        .list()
        .await?
        .into_iter()
        .map(SessionLogResponse::from)
        .collect();

    Ok(Json(records))
}
