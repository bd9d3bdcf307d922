use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, put};
use axum::{Json, Router};
use portal_core::Volunteer;
use portal_core::model::{NewVolunteer, VolunteerPatch};

use crate::auth::require_admin_middleware;
use crate::volunteer::{VolunteerService, VolunteerServiceError};
use crate::web::{AppState, ErrorResponse, MessageResponse};

/// Handler for GET /api/volunteers.
#[utoipa::path(
    get,
    path = "/api/volunteers",
    responses(
        (status = 200, description = "Every volunteer", body = Vec<Volunteer>),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse),
        (status = 403, description = "Caller is not the admin", body = ErrorResponse)
    ),
    tag = "Volunteers"
)]
#[tracing::instrument(skip(state))]
pub async fn list_volunteers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Volunteer>>, VolunteerServiceError> {
    let volunteers = VolunteerService::new(&state.db).list().await?;
    Ok(Json(volunteers))
}

/// Handler for POST /api/volunteers.
#[utoipa::path(
    post,
    path = "/api/volunteers",
    request_body = NewVolunteer,
    responses(
        (status = 201, description = "Volunteer created", body = Volunteer),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse),
        (status = 403, description = "Caller is not the admin", body = ErrorResponse)
    ),
    tag = "Volunteers"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_volunteer_handler(
    State(state): State<AppState>,
    Json(payload): Json<NewVolunteer>,
) -> Result<(StatusCode, Json<Volunteer>), VolunteerServiceError> {
    let volunteer = VolunteerService::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(volunteer)))
}

/// Handler for PUT /api/volunteers/{id}.
#[utoipa::path(
    put,
    path = "/api/volunteers/{id}",
    params(("id" = String, Path, description = "Volunteer id")),
    request_body = VolunteerPatch,
    responses(
        (status = 200, description = "Volunteer updated", body = Volunteer),
        (status = 404, description = "No such volunteer", body = ErrorResponse)
    ),
    tag = "Volunteers"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn update_volunteer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<VolunteerPatch>,
) -> Result<Json<Volunteer>, VolunteerServiceError> {
    let volunteer = VolunteerService::new(&state.db).update(&id, payload).await?;
    Ok(Json(volunteer))
}

/// Handler for DELETE /api/volunteers/{id}.
#[utoipa::path(
    delete,
    path = "/api/volunteers/{id}",
    params(("id" = String, Path, description = "Volunteer id")),
    responses(
        (status = 200, description = "Volunteer deleted", body = MessageResponse),
        (status = 404, description = "No such volunteer", body = ErrorResponse)
    ),
    tag = "Volunteers"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_volunteer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, VolunteerServiceError> {
    VolunteerService::new(&state.db).delete(&id).await?;
    Ok(Json(MessageResponse::new(format!("Volunteer {id} deleted"))))
}

/// Every volunteer route is admin only.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/volunteers",
            get(list_volunteers_handler).post(create_volunteer_handler),
        )
        .route(
            "/api/volunteers/{id}",
            put(update_volunteer_handler).delete(delete_volunteer_handler),
        )
        .route_layer(from_fn(require_admin_middleware))
        .with_state(state)
}
