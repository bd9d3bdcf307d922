//! Portal entities and the payloads used to create and update them.
//!
//! Field names follow the backend's JSON: ids travel as `_id`, everything else is
//! camelCase. Status strings the portal does not know deserialize into an
//! `Unrecognized` variant instead of failing the whole list.

use crate::id::{RecordId, Reference};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads hours that may be missing or `null` as zero.
pub fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Declares a lowercase wire enum with a catch-all `Unrecognized` variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(other, rename = "unrecognized")]
            Unrecognized,
        }

        impl $name {
            /// The string stored and sent over the wire for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unrecognized => "unrecognized",
                }
            }

            /// Parses a stored value; unknown strings become `Unrecognized`.
            pub fn parse(value: &str) -> Self {
                match value {
                    $($wire => $name::$variant,)+
                    _ => $name::Unrecognized,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    VolunteerStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

wire_enum! {
    EventStatus {
        #[default]
        Upcoming => "upcoming",
        Ongoing => "ongoing",
        Completed => "completed",
    }
}

wire_enum! {
    TaskStatus {
        #[default]
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

wire_enum! {
    Priority {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
    }
}

wire_enum! {
    AttendanceStatus {
        #[default]
        Present => "present",
        Absent => "absent",
    }
}

wire_enum! {
    UserType {
        Admin => "admin",
        #[default]
        Volunteer => "volunteer",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Volunteer {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Free text, e.g. "teaching, first aid".
    #[serde(default)]
    pub skills: String,
    /// Accumulated by the backend from attendance; read-only for clients.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub hours: f64,
    #[serde(default)]
    pub status: VolunteerStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_volunteers: u32,
    #[serde(default)]
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<Reference>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// `None` when the backend record never had a status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<Reference>,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Text,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Submitted,
}

/// A volunteer's activity report. Reports only live on the client for now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: u32,
    pub event: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewVolunteer {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub skills: String,
    /// Login password; volunteers without one sign in with their email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_volunteers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTask {
    pub event_id: RecordId,
    pub volunteer_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewAttendance {
    pub date: String,
    pub event_id: RecordId,
    pub volunteer_id: RecordId,
    pub status: AttendanceStatus,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub hours: f64,
}

/// Body of the bulk attendance endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceBatch {
    #[serde(default)]
    pub records: Vec<NewAttendance>,
}

/// Response of the bulk attendance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BatchReceipt {
    pub message: String,
    pub inserted_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VolunteerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VolunteerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_volunteers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskPatch {
    /// A patch that only moves the task to `status`.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// True when the patch touches nothing but `status`.
    pub fn changes_only_status(&self) -> bool {
        self.event_id.is_none()
            && self.volunteer_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_deserializes_backend_shape() {
        let json = r#"{
            "_id": "t-1",
            "eventId": {"_id": "e-1", "name": "Book Drive"},
            "volunteerId": "v-1",
            "title": "Sort books",
            "priority": "high",
            "status": "in-progress",
            "dueDate": "2025-10-20"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id.as_str(), "t-1");
        assert_eq!(task.status, Some(TaskStatus::InProgress));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.event_id.unwrap().embedded_name(), Some("Book Drive"));
    }

    #[test]
    fn unknown_status_does_not_fail_deserialization() {
        let task: Task =
            serde_json::from_str(r#"{"_id": "t-2", "title": "x", "status": "blocked"}"#).unwrap();

        assert_eq!(task.status, Some(TaskStatus::Unrecognized));
    }

    #[test]
    fn missing_hours_default_to_zero() {
        let record: AttendanceRecord =
            serde_json::from_str(r#"{"_id": "a-1", "date": "2025-09-15", "status": "absent"}"#)
                .unwrap();

        assert_eq!(record.hours, 0.0);
        assert_eq!(record.status, AttendanceStatus::Absent);
    }

    #[test]
    fn null_hours_default_to_zero() {
        let record: AttendanceRecord =
            serde_json::from_str(r#"{"_id": "a-2", "date": "2025-09-15", "hours": null}"#)
                .unwrap();
        let volunteer: Volunteer =
            serde_json::from_str(r#"{"_id": "v-1", "name": "Asha", "hours": null}"#).unwrap();

        assert_eq!(record.hours, 0.0);
        assert_eq!(volunteer.hours, 0.0);
    }

    #[test]
    fn status_parse_round_trips_known_values() {
        assert_eq!(TaskStatus::parse("in-progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(EventStatus::parse("cancelled"), EventStatus::Unrecognized);
    }

    #[test]
    fn status_patch_only_serializes_status() {
        let patch = TaskPatch::status(TaskStatus::Completed);

        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"status":"completed"}"#
        );
    }

    #[test]
    fn reassignment_is_more_than_a_status_change() {
        let reassign = TaskPatch {
            volunteer_id: Some(RecordId::new("v-2")),
            ..TaskPatch::status(TaskStatus::Pending)
        };

        assert!(TaskPatch::status(TaskStatus::Completed).changes_only_status());
        assert!(TaskPatch::default().changes_only_status());
        assert!(!reassign.changes_only_status());
    }
}
