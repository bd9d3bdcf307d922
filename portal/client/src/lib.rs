//! Client side of the volunteer portal: backend access, the persisted session and
//! the controllers behind the admin and volunteer dashboards.
pub mod admin;
pub mod api;
pub mod config;
pub mod session;
pub mod volunteer;

pub use admin::AdminDashboard;
pub use api::{ApiError, HttpPortalApi, PortalApi};
pub use config::ClientConfig;
pub use session::{FileSessionStore, LoginForm, MemorySessionStore, Session, SessionStore};
pub use volunteer::VolunteerDashboard;
