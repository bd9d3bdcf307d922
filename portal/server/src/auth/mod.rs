use axum::extract::{MatchedPath, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use portal_core::model::UserType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::MakeSpan;
use tracing::Span;
use utoipa::ToSchema;

use crate::config::Config;
use crate::web::error_response;

pub mod api;

/// Display name carried by the admin's token.
pub const ADMIN_NAME: &str = "Admin User";
/// Tokens expire this many days after they are issued.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Admin credentials and the signing secret.
#[derive(Clone)]
pub struct AuthState {
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
}

impl AuthState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Volunteer id; absent for the admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub user_type: UserType,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

/// The caller identified by a valid bearer token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
}

impl CurrentUser {
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: ADMIN_NAME.to_string(),
            user_type: UserType::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
            user_type: claims.user_type,
        }
    }
}

/// Why a request carries no usable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is missing")]
    Missing,
    #[error("Invalid token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, self.to_string())
    }
}

pub fn encode_jwt(
    user: &CurrentUser,
    jwt_secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let expire = chrono::Duration::days(TOKEN_LIFETIME_DAYS);
    let claims = Claims {
        id: user.id.clone(),
        email: user.email.clone(),
        user_type: user.user_type,
        name: user.name.clone(),
        exp: (now + expire).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
}

pub fn decode_jwt(token: &str, jwt_secret: &str) -> Result<Claims, TokenError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

/// The token from the `Authorization` header, with or without a `Bearer ` prefix.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the caller from the bearer token.
///
/// On success the request carries a [`CurrentUser`] extension, otherwise the
/// [`TokenError`] explaining why. Nothing is rejected here; the `require_*`
/// middlewares decide.
pub async fn auth_user_middleware(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = bearer_token(&headers)
        .ok_or(TokenError::Missing)
        .and_then(|token| decode_jwt(token, &state.jwt_secret));

    match outcome {
        Ok(claims) => {
            request.extensions_mut().insert(CurrentUser::from(claims));
        }
        Err(err) => {
            request.extensions_mut().insert(err);
        }
    }

    next.run(request).await
}

fn token_error(request: &Request) -> TokenError {
    request
        .extensions()
        .get::<TokenError>()
        .copied()
        .unwrap_or(TokenError::Missing)
}

/// Rejects requests without a valid token with 401.
pub async fn require_auth_middleware(request: Request, next: Next) -> Response {
    if request.extensions().get::<CurrentUser>().is_none() {
        return token_error(&request).into_response();
    }
    next.run(request).await
}

/// Rejects requests without a valid token with 401, and non-admins with 403.
pub async fn require_admin_middleware(request: Request, next: Next) -> Response {
    let rejection = match request.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin() => None,
        Some(_) => Some(error_response(
            StatusCode::FORBIDDEN,
            "Admin access required",
        )),
        None => Some(token_error(&request).into_response()),
    };
    match rejection {
        Some(response) => response,
        None => next.run(request).await,
    }
}

/// Span maker that keeps credentials out of the login route's span.
#[derive(Clone, Debug)]
pub struct FilteredMakeSpan;

impl<B> MakeSpan<B> for FilteredMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let uri = request.uri();
        let method = request.method();
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str);

        if uri.path() == "/api/auth/login" {
            tracing::info_span!(
                "request",
                method = %method,
                uri = %uri,
                matched_path,
                sensitive_route = true,
            )
        } else {
            tracing::info_span!(
                "request",
                method = %method,
                uri = %uri,
                matched_path,
            )
        }
    }
}
