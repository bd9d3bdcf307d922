//! HTTP access to the portal backend.
//!
//! [`PortalApi`] is the seam the dashboards are written against. [`HttpPortalApi`]
//! talks to the real backend; tests substitute the generated `MockPortalApi`.

use async_trait::async_trait;
use portal_core::model::{
    AttendanceBatch, BatchReceipt, NewEvent, NewTask, NewVolunteer, TaskPatch, UserType,
    VolunteerStatus,
};
use portal_core::{AttendanceRecord, Event, RecordId, Task, Volunteer};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Backend { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            ApiError::Backend { status, .. } => Some(*status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

/// The authenticated user as returned by the backend.
///
/// Admins carry no id. Volunteers carry theirs under `id`, older payloads under
/// `_id`; both are kept so the viewer identity can try each.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<RecordId>,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "portal_core::model::null_as_zero")]
    pub hours: f64,
    #[serde(default)]
    pub status: VolunteerStatus,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_type: UserType,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<SessionUser, ApiError>;

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError>;
    async fn create_volunteer(&self, volunteer: &NewVolunteer) -> Result<Volunteer, ApiError>;
    async fn delete_volunteer(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;
    async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError>;
    async fn delete_event(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: &RecordId, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, ApiError>;
    async fn create_attendance_batch(
        &self,
        batch: &AttendanceBatch,
    ) -> Result<BatchReceipt, ApiError>;
}

pub struct HttpPortalApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPortalApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// A client that sends `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(self.client.get(self.url(path))).send().await?;
        read_json(response).await
    }

    async fn send_json<B, T>(&self, builder: RequestBuilder, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.request(builder).json(body).send().await?;
        read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .request(self.client.delete(self.url(path)))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

/// Turns a non-2xx response into [`ApiError::Backend`], preferring the
/// backend's own `error` or `message` text.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(error), .. }) => error,
        Ok(ErrorBody { message: Some(message), .. }) => message,
        _ => format!("Request failed with status code {}", status.as_u16()),
    };
    Err(ApiError::Backend {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json(self.client.post(self.url("/api/auth/login")), request)
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .request(self.client.post(self.url("/api/auth/logout")))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        let current: CurrentUser = self.get("/api/auth/me").await?;
        Ok(current.user)
    }

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError> {
        self.get("/api/volunteers").await
    }

    async fn create_volunteer(&self, volunteer: &NewVolunteer) -> Result<Volunteer, ApiError> {
        self.send_json(self.client.post(self.url("/api/volunteers")), volunteer)
            .await
    }

    async fn delete_volunteer(&self, id: &RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/volunteers/{id}")).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get("/api/events").await
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError> {
        self.send_json(self.client.post(self.url("/api/events")), event)
            .await
    }

    async fn delete_event(&self, id: &RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/events/{id}")).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get("/api/tasks").await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.send_json(self.client.post(self.url("/api/tasks")), task)
            .await
    }

    async fn update_task(&self, id: &RecordId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.send_json(self.client.put(self.url(&format!("/api/tasks/{id}"))), patch)
            .await
    }

    async fn delete_task(&self, id: &RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/tasks/{id}")).await
    }

    async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get("/api/attendance").await
    }

    async fn create_attendance_batch(
        &self,
        batch: &AttendanceBatch,
    ) -> Result<BatchReceipt, ApiError> {
        self.send_json(self.client.post(self.url("/api/attendance/bulk")), batch)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volunteer_login_response_keeps_both_identity_fields() {
        let body = r#"{
            "token": "abc",
            "userType": "volunteer",
            "user": {"id": "v-1", "email": "asha@example.org", "name": "Asha",
                     "phone": "98765", "hours": 12, "status": "active", "userType": "volunteer"}
        }"#;

        let response: LoginResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.user_type, UserType::Volunteer);
        assert_eq!(response.user.id, Some(RecordId::new("v-1")));
        assert_eq!(response.user.alt_id, None);
        assert_eq!(response.user.hours, 12.0);
    }

    #[test]
    fn admin_user_has_no_identity() {
        let body = r#"{"email": "admin@example.org", "name": "Admin User", "userType": "admin"}"#;

        let user: SessionUser = serde_json::from_str(body).unwrap();

        assert_eq!(user.user_type, UserType::Admin);
        assert!(user.id.is_none() && user.alt_id.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpPortalApi::new(&ClientConfig {
            api_url: "http://localhost:5000/".to_string(),
        });

        assert_eq!(api.url("/api/tasks"), "http://localhost:5000/api/tasks");
    }

    #[test]
    fn backend_errors_display_their_message() {
        let err = ApiError::Backend {
            status: 403,
            message: "Admin access required".to_string(),
        };

        assert_eq!(err.to_string(), "Admin access required");
        assert!(!err.is_unauthorized());
    }
}
