use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use rally_application::{CreateEventInput, UpdateEventInput};
use rally_core::Principal;
use rally_domain::EventId;

use crate::dto::{
    CreateEventRequest, EventResponse, ProximitySearchResponse, SearchQuery, UpdateEventRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = state
        .event_service
        .create(
            &user,
            CreateEventInput {
                name: payload.name,
                occurs_at: payload.occurs_at,
                address: payload.address,
                image_url: payload.image_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn list_events_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list_all()
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn list_my_events_handler(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list_mine(&user)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn search_events_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ProximitySearchResponse>> {
    let outcome = state
        .event_service
        .search_nearby(query.address.as_str())
        .await?;

    Ok(Json(ProximitySearchResponse::from(outcome)))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = EventId::parse(event_id.as_str())?;
    let event = state.event_service.get(id).await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let id = EventId::parse(event_id.as_str())?;
    let event = state
        .event_service
        .update(
            &user,
            id,
            UpdateEventInput {
                name: payload.name,
                occurs_at: payload.occurs_at,
                address: payload.address,
                image_url: payload.image_url,
            },
        )
        .await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(event_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = EventId::parse(event_id.as_str())?;
    state.event_service.delete(&user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
