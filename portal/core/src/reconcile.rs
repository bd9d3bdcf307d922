//! Joins volunteers, events, tasks and attendance by id for display.
//!
//! Nothing in here fails: a reference that points at no known record degrades to
//! a sentinel display string and the referring record stays visible.

use crate::format::{day_of_month, format_date};
use crate::id::{RecordId, Reference, resolve_id};
use crate::model::{
    AttendanceRecord, Event, EventStatus, Priority, Task, TaskStatus, Volunteer,
};

/// Shown in admin tables when a volunteer or event reference is dangling.
pub const UNKNOWN: &str = "Unknown";
/// Shown on a volunteer's task list when the task's event is unknown.
pub const UNKNOWN_EVENT: &str = "Unknown Event";
/// Role shown next to every event on the volunteer dashboard.
pub const VOLUNTEER_ROLE: &str = "Volunteer";

/// The identity of the signed-in volunteer.
///
/// The user object handed out at login is not consistent about which field
/// carries the id, so both candidates are kept and tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewer {
    id: Option<RecordId>,
    alt_id: Option<RecordId>,
}

impl Viewer {
    pub fn new(id: Option<RecordId>, alt_id: Option<RecordId>) -> Self {
        Self { id, alt_id }
    }

    /// The first non-empty id, if the viewer has one at all.
    pub fn identity(&self) -> Option<&RecordId> {
        self.id
            .as_ref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.alt_id.as_ref().filter(|id| !id.is_empty()))
    }

    pub fn owns(&self, task: &Task) -> bool {
        match (self.identity(), task.volunteer_id.as_ref()) {
            (Some(viewer), Some(assignee)) => resolve_id(assignee) == viewer,
            _ => false,
        }
    }
}

/// A task as shown on the volunteer's own dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTask {
    pub id: RecordId,
    pub title: String,
    pub event: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
}

/// Tasks assigned to `viewer`, each labelled with its event's name.
pub fn tasks_for_volunteer(viewer: &Viewer, tasks: &[Task], events: &[Event]) -> Vec<AssignedTask> {
    tasks
        .iter()
        .filter(|task| viewer.owns(task))
        .map(|task| AssignedTask {
            id: task.id.clone(),
            title: task.title.clone(),
            event: task
                .event_id
                .as_ref()
                .and_then(|reference| find_event(reference, events))
                .map(|event| event.name.clone())
                .unwrap_or_else(|| UNKNOWN_EVENT.to_string()),
            status: task.status.unwrap_or_default(),
            priority: task.priority,
            due_date: task.due_date.clone(),
        })
        .collect()
}

pub fn find_volunteer<'a>(reference: &Reference, volunteers: &'a [Volunteer]) -> Option<&'a Volunteer> {
    let id = resolve_id(reference);
    volunteers.iter().find(|volunteer| &volunteer.id == id)
}

pub fn find_event<'a>(reference: &Reference, events: &'a [Event]) -> Option<&'a Event> {
    let id = resolve_id(reference);
    events.iter().find(|event| &event.id == id)
}

/// Display name for a volunteer reference: embedded name, then lookup, then [`UNKNOWN`].
pub fn volunteer_name<'a>(reference: Option<&'a Reference>, volunteers: &'a [Volunteer]) -> &'a str {
    let Some(reference) = reference else {
        return UNKNOWN;
    };
    reference
        .embedded_name()
        .or_else(|| find_volunteer(reference, volunteers).map(|v| v.name.as_str()))
        .unwrap_or(UNKNOWN)
}

/// Display name for an event reference: embedded name, then lookup, then [`UNKNOWN`].
pub fn event_name<'a>(reference: Option<&'a Reference>, events: &'a [Event]) -> &'a str {
    let Some(reference) = reference else {
        return UNKNOWN;
    };
    reference
        .embedded_name()
        .or_else(|| find_event(reference, events).map(|e| e.name.as_str()))
        .unwrap_or(UNKNOWN)
}

/// A card on the admin task board.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard<'a> {
    pub task: &'a Task,
    pub assignee: &'a str,
    pub event: &'a str,
}

pub fn task_cards<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    volunteers: &'a [Volunteer],
    events: &'a [Event],
) -> Vec<TaskCard<'a>> {
    tasks
        .into_iter()
        .map(|task| TaskCard {
            task,
            assignee: volunteer_name(task.volunteer_id.as_ref(), volunteers),
            event: event_name(task.event_id.as_ref(), events),
        })
        .collect()
}

/// A row of the attendance table.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRow<'a> {
    pub record: &'a AttendanceRecord,
    pub volunteer: &'a str,
    pub event: &'a str,
}

impl AttendanceRow<'_> {
    pub fn date(&self) -> String {
        format_date(&self.record.date)
    }
}

pub fn attendance_rows<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    volunteers: &'a [Volunteer],
    events: &'a [Event],
) -> Vec<AttendanceRow<'a>> {
    records
        .into_iter()
        .map(|record| AttendanceRow {
            record,
            volunteer: volunteer_name(record.volunteer_id.as_ref(), volunteers),
            event: event_name(record.event_id.as_ref(), events),
        })
        .collect()
}

/// Attendance records that belong to `viewer`.
pub fn attendance_for_volunteer<'a>(
    viewer: &Viewer,
    records: &'a [AttendanceRecord],
) -> Vec<&'a AttendanceRecord> {
    let Some(identity) = viewer.identity() else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|record| {
            record
                .volunteer_id
                .as_ref()
                .is_some_and(|reference| reference.points_to(identity))
        })
        .collect()
}

/// An event as listed on the volunteer dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerEvent {
    pub id: RecordId,
    pub name: String,
    pub date: String,
    pub location: String,
    pub status: EventStatus,
    pub role: &'static str,
}

impl VolunteerEvent {
    /// The date as shown on the event card, e.g. `20 Oct 2025`.
    pub fn display_date(&self) -> String {
        format_date(&self.date)
    }

    /// Day number for the card's calendar badge.
    pub fn day(&self) -> Option<u32> {
        day_of_month(&self.date)
    }
}

pub fn volunteer_events(events: &[Event]) -> Vec<VolunteerEvent> {
    events
        .iter()
        .map(|event| VolunteerEvent {
            id: event.id.clone(),
            name: event.name.clone(),
            date: event.date.clone(),
            location: event.location.clone(),
            status: event.status,
            role: VOLUNTEER_ROLE,
        })
        .collect()
}
