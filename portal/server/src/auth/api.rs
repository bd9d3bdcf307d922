use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use portal_core::model::{UserType, VolunteerStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{CurrentUser, encode_jwt, require_auth_middleware};
use crate::volunteer::{VolunteerService, VolunteerServiceError};
use crate::web::{AppState, ErrorResponse, MessageResponse, error_response, internal_error};

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// `admin` or `volunteer`; anything else signs in as a volunteer.
    #[serde(default)]
    pub user_type: UserType,
}

/// The signed-in user as the dashboards see it.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VolunteerStatus>,
    pub user_type: UserType,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_type: UserType,
    pub user: LoginUser,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MeResponse {
    pub user: CurrentUser,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password required")]
    MissingCredentials,
    #[error("Invalid admin credentials")]
    InvalidAdminCredentials,
    #[error("Volunteer not found")]
    VolunteerNotFound,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Failed to generate authentication token")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Lookup(#[from] VolunteerServiceError),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::MissingCredentials => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            LoginError::InvalidAdminCredentials
            | LoginError::VolunteerNotFound
            | LoginError::InvalidPassword => {
                error_response(StatusCode::UNAUTHORIZED, self.to_string())
            }
            LoginError::Token(err) => internal_error(err),
            LoginError::Lookup(err) => err.into_response(),
        }
    }
}

/// Signs in the admin against the configured credentials, or a volunteer
/// against their stored password. A volunteer without one uses their email.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Credentials rejected", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[tracing::instrument(skip(state, payload), fields(email = %payload.email, user_type = %payload.user_type))]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, LoginError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    if payload.user_type == UserType::Admin {
        if payload.email != state.auth.admin_email || payload.password != state.auth.admin_password
        {
            return Err(LoginError::InvalidAdminCredentials);
        }
        let admin = CurrentUser::admin(payload.email);
        let token = encode_jwt(&admin, &state.auth.jwt_secret)?;
        tracing::info!("Admin signed in");
        return Ok(Json(LoginResponse {
            token,
            user_type: UserType::Admin,
            user: LoginUser {
                id: None,
                email: admin.email,
                name: admin.name,
                phone: None,
                hours: None,
                status: None,
                user_type: UserType::Admin,
            },
        }));
    }

    let volunteer = VolunteerService::new(&state.db)
        .find_by_email(&payload.email)
        .await?
        .ok_or(LoginError::VolunteerNotFound)?;

    let expected = volunteer.password.as_deref().unwrap_or(&volunteer.email);
    if payload.password != expected {
        return Err(LoginError::InvalidPassword);
    }

    let user = CurrentUser {
        id: Some(volunteer.id.clone()),
        email: volunteer.email.clone(),
        name: volunteer.name.clone(),
        user_type: UserType::Volunteer,
    };
    let token = encode_jwt(&user, &state.auth.jwt_secret)?;
    tracing::info!(volunteer_id = %volunteer.id, "Volunteer signed in");

    Ok(Json(LoginResponse {
        token,
        user_type: UserType::Volunteer,
        user: LoginUser {
            id: Some(volunteer.id),
            email: volunteer.email,
            name: volunteer.name,
            phone: Some(volunteer.phone),
            hours: Some(volunteer.hours),
            status: Some(VolunteerStatus::parse(&volunteer.status)),
            user_type: UserType::Volunteer,
        },
    }))
}

/// Tokens are stateless; signing out is the client discarding its token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[tracing::instrument]
pub async fn logout_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The caller", body = MeResponse),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[tracing::instrument(skip(user))]
pub async fn me_handler(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse { user })
}

pub fn create_api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .route_layer(from_fn(require_auth_middleware));

    Router::new()
        .route("/api/auth/login", post(login_handler))
        .merge(protected)
        .with_state(state)
}
