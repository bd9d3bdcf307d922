use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use portal_core::Event;
use portal_core::model::{EventPatch, NewEvent};

use crate::auth::{require_admin_middleware, require_auth_middleware};
use crate::event::{EventService, EventServiceError};
use crate::web::{AppState, ErrorResponse, MessageResponse};

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Every event", body = Vec<Event>),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[tracing::instrument(skip(state))]
pub async fn list_events_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>, EventServiceError> {
    let events = EventService::new(&state.db).list().await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 403, description = "Caller is not the admin", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), EventServiceError> {
    let event = EventService::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "No such event", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EventPatch>,
) -> Result<Json<Event>, EventServiceError> {
    let event = EventService::new(&state.db).update(&id, payload).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, EventServiceError> {
    EventService::new(&state.db).delete(&id).await?;
    Ok(Json(MessageResponse::new(format!("Event {id} deleted"))))
}

/// Any signed-in user can list events; changes are admin only.
pub fn create_api_router(state: AppState) -> Router {
    let read = Router::new()
        .route("/api/events", get(list_events_handler))
        .route_layer(from_fn(require_auth_middleware));

    let admin = Router::new()
        .route("/api/events", post(create_event_handler))
        .route(
            "/api/events/{id}",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route_layer(from_fn(require_admin_middleware));

    read.merge(admin).with_state(state)
}
