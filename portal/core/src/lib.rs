//! Core domain models and client-side data logic for the volunteer portal.
pub mod format;
pub mod forms;
pub mod id;
pub mod model;
pub mod notify;
pub mod reconcile;
pub mod stats;

pub use forms::{Modal, ValidationError, VolunteerSelection};
pub use id::{Reference, RecordId, resolve_id};
pub use model::{AttendanceRecord, Event, Report, Task, Volunteer};
pub use notify::Notifications;
