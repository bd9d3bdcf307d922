use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use portal_core::Task;
use portal_core::model::{NewTask, TaskPatch};

use crate::auth::{CurrentUser, require_admin_middleware, require_auth_middleware};
use crate::task::{TaskService, TaskServiceError};
use crate::web::{AppState, ErrorResponse, MessageResponse};

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Every task", body = Vec<Task>),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
#[tracing::instrument(skip(state))]
pub async fn list_tasks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, TaskServiceError> {
    let tasks = TaskService::new(&state.db).list().await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task assigned", body = Task),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 403, description = "Caller is not the admin", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_task_handler(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), TaskServiceError> {
    let task = TaskService::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Volunteers move tasks between statuses through this route, so it only needs
/// a valid token. Anyone but the admin may change nothing but the status.
/// Served for both PUT and PATCH.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Unknown status or priority", body = ErrorResponse),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse),
        (status = 403, description = "A volunteer changed more than the status", body = ErrorResponse),
        (status = 404, description = "No such task", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
#[tracing::instrument(skip(state, user, payload), fields(user_type = %user.user_type))]
pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPatch>,
) -> Result<Json<Task>, TaskServiceError> {
    if !user.is_admin() && !payload.changes_only_status() {
        return Err(TaskServiceError::StatusOnly);
    }
    let task = TaskService::new(&state.db).update(&id, payload).await?;
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "No such task", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, TaskServiceError> {
    TaskService::new(&state.db).delete(&id).await?;
    Ok(Json(MessageResponse::new(format!("Task {id} deleted"))))
}

pub fn create_api_router(state: AppState) -> Router {
    let member = Router::new()
        .route("/api/tasks", get(list_tasks_handler))
        .route(
            "/api/tasks/{id}",
            put(update_task_handler).patch(update_task_handler),
        )
        .route_layer(from_fn(require_auth_middleware));

    let admin = Router::new()
        .route("/api/tasks", post(create_task_handler))
        .route("/api/tasks/{id}", delete(delete_task_handler))
        .route_layer(from_fn(require_admin_middleware));

    member.merge(admin).with_state(state)
}
