//! Login and the persisted session.
//!
//! A session is three string entries in a key-value store: the bearer token,
//! the user as JSON, and the user type. They are written together on login and
//! removed together on logout.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use portal_core::model::UserType;
use portal_core::reconcile::Viewer;
use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, LoginRequest, PortalApi, SessionUser};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const USER_TYPE_KEY: &str = "userType";

const LOGIN_FALLBACK: &str = "Login failed. Please try again.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session storage")]
    Io(#[from] std::io::Error),
    #[error("Session storage is corrupt")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Email and password required")]
    MissingCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] SessionError),
}

/// Key-value storage that outlives the process.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileSessionStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    fn save(&self) -> Result<(), SessionError> {
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub user_type: UserType,
}

impl Session {
    /// Reads a previously saved session. Any missing or unreadable entry means
    /// there is no session.
    pub fn restore(store: &impl SessionStore) -> Option<Self> {
        let token = store.get(TOKEN_KEY)?;
        let user = serde_json::from_str(&store.get(USER_KEY)?).ok()?;
        let user_type = UserType::parse(&store.get(USER_TYPE_KEY)?);
        if user_type == UserType::Unrecognized {
            return None;
        }
        Some(Self {
            token,
            user,
            user_type,
        })
    }

    pub fn save(&self, store: &mut impl SessionStore) -> Result<(), SessionError> {
        store.set(TOKEN_KEY, &self.token)?;
        store.set(USER_KEY, &serde_json::to_string(&self.user)?)?;
        store.set(USER_TYPE_KEY, self.user_type.as_str())
    }

    pub fn clear(store: &mut impl SessionStore) -> Result<(), SessionError> {
        store.remove(TOKEN_KEY)?;
        store.remove(USER_KEY)?;
        store.remove(USER_TYPE_KEY)
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// The identity used to pick this user's tasks and attendance.
    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.user.id.clone(), self.user.alt_id.clone())
    }
}

/// The login page's inputs. The role toggle starts on admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            user_type: UserType::Admin,
        }
    }
}

impl LoginForm {
    /// Signs in and persists the resulting session.
    ///
    /// Blank credentials are rejected without contacting the backend. A backend
    /// rejection surfaces the backend's message.
    #[tracing::instrument(skip_all, fields(email = %self.email, user_type = %self.user_type))]
    pub async fn submit<API: PortalApi>(
        &self,
        api: &API,
        store: &mut impl SessionStore,
    ) -> Result<Session, LoginError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
            user_type: self.user_type,
        };
        let response = api.login(&request).await.map_err(|err| {
            error!("Login error: {err}");
            match err {
                ApiError::Backend { message, .. } => LoginError::Rejected(message),
                ApiError::Transport(_) => LoginError::Rejected(LOGIN_FALLBACK.to_string()),
            }
        })?;

        let session = Session {
            token: response.token,
            user: response.user,
            user_type: response.user_type,
        };
        session.save(store)?;
        info!("Signed in");
        Ok(session)
    }
}

/// Ends the session. Local state is cleared even when the backend call fails,
/// since the token is only meaningful on this side.
pub async fn logout<API: PortalApi>(
    api: &API,
    store: &mut impl SessionStore,
) -> Result<(), SessionError> {
    if let Err(err) = api.logout().await {
        error!("Logout request failed: {err}");
    }
    Session::clear(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginResponse, MockPortalApi};
    use portal_core::RecordId;

    fn volunteer_user() -> SessionUser {
        SessionUser {
            id: Some(RecordId::new("v-1")),
            email: "asha@example.org".to_string(),
            name: "Asha".to_string(),
            user_type: UserType::Volunteer,
            ..Default::default()
        }
    }

    fn filled_form() -> LoginForm {
        LoginForm {
            email: "asha@example.org".to_string(),
            password: "secret".to_string(),
            user_type: UserType::Volunteer,
        }
    }

    #[tokio::test]
    async fn successful_login_persists_all_three_entries() {
        // Arrange
        let mut api = MockPortalApi::new();
        api.expect_login()
            .withf(|request| request.user_type == UserType::Volunteer)
            .times(1)
            .returning(|_| {
                Ok(LoginResponse {
                    token: "jwt".to_string(),
                    user_type: UserType::Volunteer,
                    user: volunteer_user(),
                })
            });
        let mut store = MemorySessionStore::default();

        // Act
        let session = filled_form().submit(&api, &mut store).await.unwrap();

        // Assert
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("jwt"));
        assert_eq!(store.get(USER_TYPE_KEY).as_deref(), Some("volunteer"));
        assert_eq!(Session::restore(&store), Some(session.clone()));
        assert_eq!(
            session.viewer().identity(),
            Some(&RecordId::new("v-1"))
        );
    }

    #[tokio::test]
    async fn blank_password_never_reaches_the_backend() {
        let mut api = MockPortalApi::new();
        api.expect_login().never();
        let mut store = MemorySessionStore::default();
        let form = LoginForm {
            password: String::new(),
            ..filled_form()
        };

        let result = form.submit(&api, &mut store).await;

        assert!(matches!(result, Err(LoginError::MissingCredentials)));
        assert!(Session::restore(&store).is_none());
    }

    #[tokio::test]
    async fn rejected_login_shows_backend_message() {
        let mut api = MockPortalApi::new();
        api.expect_login().returning(|_| {
            Err(ApiError::Backend {
                status: 401,
                message: "Invalid password".to_string(),
            })
        });
        let mut store = MemorySessionStore::default();

        let result = filled_form().submit(&api, &mut store).await;

        match result {
            Err(LoginError::Rejected(message)) => assert_eq!(message, "Invalid password"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(store.get(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn logout_clears_storage_even_if_backend_fails() {
        let mut api = MockPortalApi::new();
        api.expect_logout().times(1).returning(|| {
            Err(ApiError::Backend {
                status: 401,
                message: "Token has expired".to_string(),
            })
        });
        let mut store = MemorySessionStore::default();
        Session {
            token: "jwt".to_string(),
            user: volunteer_user(),
            user_type: UserType::Volunteer,
        }
        .save(&mut store)
        .unwrap();

        logout(&api, &mut store).await.unwrap();

        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
        assert!(store.get(USER_TYPE_KEY).is_none());
    }

    #[test]
    fn file_store_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session {
            token: "jwt".to_string(),
            user: volunteer_user(),
            user_type: UserType::Volunteer,
        };

        let mut store = FileSessionStore::open(&path).unwrap();
        session.save(&mut store).unwrap();
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(Session::restore(&reopened), Some(session));
    }

    #[test]
    fn unknown_user_type_is_not_a_session() {
        let mut store = MemorySessionStore::default();
        store.set(TOKEN_KEY, "jwt").unwrap();
        store
            .set(USER_KEY, r#"{"email": "x@example.org"}"#)
            .unwrap();
        store.set(USER_TYPE_KEY, "superuser").unwrap();

        assert!(Session::restore(&store).is_none());
    }
}
