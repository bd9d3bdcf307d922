use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router};
use portal_core::AttendanceRecord;
use portal_core::model::{AttendanceBatch, BatchReceipt};

use crate::attendance::{AttendanceService, AttendanceServiceError};
use crate::auth::{require_admin_middleware, require_auth_middleware};
use crate::web::{AppState, ErrorResponse};

#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Every attendance record", body = Vec<AttendanceRecord>),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[tracing::instrument(skip(state))]
pub async fn list_attendance_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceRecord>>, AttendanceServiceError> {
    let records = AttendanceService::new(&state.db).list().await?;
    Ok(Json(records))
}

/// Handler for POST /api/attendance/bulk.
#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = AttendanceBatch,
    responses(
        (status = 201, description = "Records stored and hours credited", body = BatchReceipt),
        (status = 400, description = "Empty batch or incomplete record", body = ErrorResponse),
        (status = 403, description = "Caller is not the admin", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_bulk_attendance_handler(
    State(state): State<AppState>,
    Json(payload): Json<AttendanceBatch>,
) -> Result<(StatusCode, Json<BatchReceipt>), AttendanceServiceError> {
    let receipt = AttendanceService::new(&state.db)
        .create_batch(payload.records)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub fn create_api_router(state: AppState) -> Router {
    let member = Router::new()
        .route("/api/attendance", get(list_attendance_handler))
        .route_layer(from_fn(require_auth_middleware));

    let admin = Router::new()
        .route("/api/attendance/bulk", post(create_bulk_attendance_handler))
        .route_layer(from_fn(require_admin_middleware));

    member.merge(admin).with_state(state)
}
