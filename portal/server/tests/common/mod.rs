#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use migration::MigratorTrait;
use portal_core::model::UserType;
use portal_server::auth::{AuthState, CurrentUser, encode_jwt};
use portal_server::web::{AppState, create_app};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@portal.test";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const JWT_SECRET: &str = "test-secret";

/// Test context for database backed tests.
pub struct TestContext {
    // keeps the database file alive for the whole test
    pub dir: TempDir,
    pub db: DatabaseConnection,
}

impl TestContext {
    pub fn app(&self) -> Router {
        create_app(AppState::new(self.db.clone(), auth_state()))
    }
}

pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let dir = tempfile::tempdir()?;
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("portal.db").display());
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(TestContext { dir, db })
}

pub fn auth_state() -> AuthState {
    AuthState {
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
    }
}

pub fn admin_token() -> String {
    encode_jwt(&CurrentUser::admin(ADMIN_EMAIL), JWT_SECRET).unwrap()
}

pub fn volunteer_token(id: &str) -> String {
    let user = CurrentUser {
        id: Some(id.to_string()),
        email: format!("{id}@portal.test"),
        name: "Test Volunteer".to_string(),
        user_type: UserType::Volunteer,
    };
    encode_jwt(&user, JWT_SECRET).unwrap()
}

/// Sends one request and returns the status and the decoded JSON body.
/// Non-JSON bodies decode to `Value::Null`.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
