use axum::Json;
use axum::Router;
use axum::http::{StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthState, FilteredMakeSpan, auth_user_middleware};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthState>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, auth: AuthState) -> Self {
        Self {
            db: Arc::new(db),
            auth: Arc::new(auth),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// JSON body of responses that only confirm an action.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Logs `err` and answers with a generic 500.
pub fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!("Request failed: {err}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again later.",
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::api::login_handler,
        crate::auth::api::logout_handler,
        crate::auth::api::me_handler,
        crate::volunteer::api::list_volunteers_handler,
        crate::volunteer::api::create_volunteer_handler,
        crate::volunteer::api::update_volunteer_handler,
        crate::volunteer::api::delete_volunteer_handler,
        crate::event::api::list_events_handler,
        crate::event::api::create_event_handler,
        crate::event::api::update_event_handler,
        crate::event::api::delete_event_handler,
        crate::task::api::list_tasks_handler,
        crate::task::api::create_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
        crate::attendance::api::list_attendance_handler,
        crate::attendance::api::create_bulk_attendance_handler,
    ),
    components(schemas(ErrorResponse, MessageResponse)),
    tags(
        (name = "Auth", description = "Sign in and session lookup"),
        (name = "Volunteers", description = "Volunteer records"),
        (name = "Events", description = "Events volunteers attend"),
        (name = "Tasks", description = "Tasks assigned to volunteers"),
        (name = "Attendance", description = "Attendance sessions and hours"),
    )
)]
pub struct ApiDoc;

/// Builds the full application: API routes, docs, health and tracing.
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(crate::auth::api::create_api_router(state.clone()))
        .merge(crate::volunteer::api::create_api_router(state.clone()))
        .merge(crate::event::api::create_api_router(state.clone()))
        .merge(crate::task::api::create_api_router(state.clone()))
        .merge(crate::attendance::api::create_api_router(state.clone()))
        .layer(from_fn_with_state(state.auth.clone(), auth_user_middleware));

    Router::new()
        .route("/", axum::routing::get(index_handler))
        .route("/health", axum::routing::get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION]))
                .layer(TraceLayer::new_for_http().make_span_with(FilteredMakeSpan))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                ),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let state = AppState::new(db, AuthState::from_config(&config));
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Service banner listing the top-level endpoints.
#[tracing::instrument]
pub async fn index_handler() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Volunteer Portal API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "login": "/api/auth/login",
            "logout": "/api/auth/logout",
            "volunteers": "/api/volunteers",
            "events": "/api/events",
            "tasks": "/api/tasks",
            "attendance": "/api/attendance",
            "docs": "/swagger-ui"
        }
    }))
}
