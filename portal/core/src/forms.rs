//! Draft state for the create flows and the modal state machine around them.
//!
//! Drafts hold raw user input. `validate()` runs right before submission and
//! either produces the payload to send or a [`ValidationError`] to show; a
//! rejected draft never reaches the network.

use crate::id::RecordId;
use crate::model::{
    AttendanceBatch, AttendanceStatus, NewAttendance, NewEvent, NewTask, NewVolunteer, Priority,
    Report, ReportKind, ReportStatus,
};
use thiserror::Error;

/// Default for the event form's "required volunteers" field.
pub const DEFAULT_REQUIRED_VOLUNTEERS: &str = "10";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),
    #[error("Please select at least one volunteer")]
    NoVolunteersSelected,
    #[error("{0} must be a whole number")]
    NotANumber(&'static str),
    #[error("Please write a report or attach a photo")]
    EmptyReport,
}

/// Collects the names of blank required fields.
fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<_> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A create dialog: closed or open, with the draft it edits.
///
/// Opening is user initiated. Cancelling discards the draft; completing a
/// successful submit resets it. Both close the modal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modal<D> {
    open: bool,
    draft: D,
}

impl<D: Default> Modal<D> {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    pub fn complete(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.draft = D::default();
        self.open = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VolunteerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub skills: String,
}

impl VolunteerDraft {
    pub fn validate(&self) -> Result<NewVolunteer, ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ])?;
        Ok(NewVolunteer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            skills: self.skills.trim().to_string(),
            password: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: String,
    pub location: String,
    pub description: String,
    pub required_volunteers: String,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: String::new(),
            location: String::new(),
            description: String::new(),
            required_volunteers: DEFAULT_REQUIRED_VOLUNTEERS.to_string(),
        }
    }
}

impl EventDraft {
    pub fn validate(&self) -> Result<NewEvent, ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("date", self.date.as_str()),
            ("location", self.location.as_str()),
        ])?;
        let required_volunteers = match self.required_volunteers.trim() {
            "" => 0,
            raw => raw
                .parse::<u32>()
                .map_err(|_| ValidationError::NotANumber("Required volunteers"))?,
        };
        Ok(NewEvent {
            name: self.name.trim().to_string(),
            date: self.date.trim().to_string(),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            required_volunteers,
            status: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub event_id: String,
    pub volunteer_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        require(&[
            ("event", self.event_id.as_str()),
            ("volunteer", self.volunteer_id.as_str()),
            ("title", self.title.as_str()),
        ])?;
        Ok(NewTask {
            event_id: RecordId::new(self.event_id.trim()),
            volunteer_id: RecordId::new(self.volunteer_id.trim()),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            status: None,
            due_date: optional(&self.due_date),
        })
    }
}

/// Ordered set of volunteer ids picked for an attendance batch.
///
/// Toggling an id adds it when absent and removes it when present, so toggling
/// twice leaves the set as it was.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VolunteerSelection {
    ids: Vec<RecordId>,
}

impl VolunteerSelection {
    pub fn toggle(&mut self, id: RecordId) {
        if let Some(position) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(position);
        } else {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub date: String,
    pub event_id: String,
    pub selection: VolunteerSelection,
    pub status: AttendanceStatus,
    pub hours: String,
}

impl Default for AttendanceDraft {
    fn default() -> Self {
        Self {
            date: String::new(),
            event_id: String::new(),
            selection: VolunteerSelection::default(),
            status: AttendanceStatus::Present,
            hours: "0".to_string(),
        }
    }
}

impl AttendanceDraft {
    /// Hours as entered; anything unparseable counts as zero, as does an absence.
    pub fn hours(&self) -> f64 {
        if self.status == AttendanceStatus::Absent {
            return 0.0;
        }
        self.hours
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|hours| hours.is_finite() && *hours >= 0.0)
            .unwrap_or(0.0)
    }

    /// One record per selected volunteer, all sharing date, event, status and hours.
    pub fn validate(&self) -> Result<AttendanceBatch, ValidationError> {
        require(&[("date", self.date.as_str()), ("event", self.event_id.as_str())])?;
        if self.selection.is_empty() {
            return Err(ValidationError::NoVolunteersSelected);
        }
        let date = self.date.trim().to_string();
        let event_id = RecordId::new(self.event_id.trim());
        let hours = self.hours();
        let records = self
            .selection
            .iter()
            .map(|volunteer_id| NewAttendance {
                date: date.clone(),
                event_id: event_id.clone(),
                volunteer_id: volunteer_id.clone(),
                status: self.status,
                hours,
            })
            .collect();
        Ok(AttendanceBatch { records })
    }
}

/// A volunteer's report in progress: free text and/or an attached photo name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDraft {
    pub text: String,
    pub file: Option<String>,
}

impl ReportDraft {
    pub fn validate(&self, id: u32, event: &str, date: &str) -> Result<Report, ValidationError> {
        let content = optional(&self.text);
        if content.is_none() && self.file.is_none() {
            return Err(ValidationError::EmptyReport);
        }
        Ok(Report {
            id,
            event: event.to_string(),
            date: date.to_string(),
            kind: if self.file.is_some() {
                ReportKind::Photo
            } else {
                ReportKind::Text
            },
            status: ReportStatus::Submitted,
            content,
            file: self.file.clone(),
        })
    }
}
