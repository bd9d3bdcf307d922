//! The admin dashboard: every list the backend holds, plus the create, delete
//! and status-change flows over them.

use chrono::Utc;
use portal_core::forms::{AttendanceDraft, EventDraft, TaskDraft, VolunteerDraft};
use portal_core::model::{TaskPatch, TaskStatus};
use portal_core::reconcile::{AttendanceRow, TaskCard, attendance_rows, task_cards};
use portal_core::stats::{
    DashboardStats, TaskBoard, dashboard_stats, search_volunteers, upcoming_preview,
    volunteer_preview,
};
use portal_core::{
    AttendanceRecord, Event, Modal, Notifications, RecordId, Task, ValidationError, Volunteer,
};
use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, PortalApi};

#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Nothing is awaiting confirmation")]
    NothingToConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Dashboard,
    Volunteers,
    Events,
    Tasks,
    Attendance,
}

/// A delete that has been requested but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDeletion {
    Volunteer(RecordId),
    Event(RecordId),
    Task(RecordId),
}

impl PendingDeletion {
    pub fn prompt(&self) -> &'static str {
        match self {
            PendingDeletion::Volunteer(_) => "Are you sure you want to delete this volunteer?",
            PendingDeletion::Event(_) => "Are you sure you want to delete this event?",
            PendingDeletion::Task(_) => "Are you sure you want to delete this task?",
        }
    }
}

pub struct AdminDashboard<'a, API: PortalApi> {
    api: &'a API,
    volunteers: Vec<Volunteer>,
    events: Vec<Event>,
    tasks: Vec<Task>,
    attendance: Vec<AttendanceRecord>,
    loading: bool,
    pending_deletion: Option<PendingDeletion>,
    error: Option<String>,
    pub tab: AdminTab,
    pub search: String,
    pub volunteer_form: Modal<VolunteerDraft>,
    pub event_form: Modal<EventDraft>,
    pub task_form: Modal<TaskDraft>,
    pub attendance_form: Modal<AttendanceDraft>,
    pub notifications: Notifications,
}

impl<'a, API: PortalApi> AdminDashboard<'a, API> {
    pub fn new(api: &'a API) -> Self {
        Self {
            api,
            volunteers: Vec::new(),
            events: Vec::new(),
            tasks: Vec::new(),
            attendance: Vec::new(),
            loading: true,
            pending_deletion: None,
            error: None,
            tab: AdminTab::default(),
            search: String::new(),
            volunteer_form: Modal::default(),
            event_form: Modal::default(),
            task_form: Modal::default(),
            attendance_form: Modal::default(),
            notifications: Notifications::default(),
        }
    }

    /// Fetches all four lists at once. Lists are only replaced when every fetch
    /// succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let fetched = tokio::try_join!(
            self.api.list_volunteers(),
            self.api.list_events(),
            self.api.list_tasks(),
            self.api.list_attendance(),
        );
        self.loading = false;

        match fetched {
            Ok((volunteers, events, tasks, attendance)) => {
                info!(
                    volunteers = volunteers.len(),
                    events = events.len(),
                    tasks = tasks.len(),
                    attendance = attendance.len(),
                    "Dashboard loaded"
                );
                self.volunteers = volunteers;
                self.events = events;
                self.tasks = tasks;
                self.attendance = attendance;
                Ok(())
            }
            Err(err) => {
                error!("Error fetching data: {err}");
                self.error = Some(format!("Error loading data: {err}"));
                Err(err)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn stats(&self) -> DashboardStats {
        dashboard_stats(&self.volunteers, &self.events, &self.tasks)
    }

    pub fn recent_volunteers(&self) -> &[Volunteer] {
        volunteer_preview(&self.volunteers)
    }

    pub fn upcoming_events(&self) -> Vec<&Event> {
        upcoming_preview(&self.events)
    }

    /// Volunteers matching the search box.
    pub fn filtered_volunteers(&self) -> Vec<&Volunteer> {
        search_volunteers(&self.volunteers, &self.search)
    }

    pub fn board(&self) -> TaskBoard<'_> {
        TaskBoard::partition(&self.tasks)
    }

    pub fn task_cards(&self) -> Vec<TaskCard<'_>> {
        task_cards(&self.tasks, &self.volunteers, &self.events)
    }

    pub fn attendance_rows(&self) -> Vec<AttendanceRow<'_>> {
        attendance_rows(&self.attendance, &self.volunteers, &self.events)
    }

    /// The banner text for the last failure, if it has not been dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn reject(&mut self, err: ValidationError) -> ActionError {
        self.error = Some(err.to_string());
        ActionError::Invalid(err)
    }

    fn fail(&mut self, action: &str, err: ApiError) -> ActionError {
        error!("Error {action}: {err}");
        self.error = Some(format!("Error: {err}"));
        ActionError::Api(err)
    }

    fn succeed(&mut self, message: impl Into<String>) {
        self.error = None;
        self.notifications.push(message, Utc::now());
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_volunteer(&mut self) -> Result<(), ActionError> {
        let payload = match self.volunteer_form.draft().validate() {
            Ok(payload) => payload,
            Err(err) => return Err(self.reject(err)),
        };
        match self.api.create_volunteer(&payload).await {
            Ok(volunteer) => {
                self.volunteers.push(volunteer);
                self.volunteer_form.complete();
                self.succeed("Volunteer added successfully!");
                Ok(())
            }
            Err(err) => Err(self.fail("adding volunteer", err)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_event(&mut self) -> Result<(), ActionError> {
        let payload = match self.event_form.draft().validate() {
            Ok(payload) => payload,
            Err(err) => return Err(self.reject(err)),
        };
        match self.api.create_event(&payload).await {
            Ok(event) => {
                self.events.push(event);
                self.event_form.complete();
                self.succeed("Event created successfully!");
                Ok(())
            }
            Err(err) => Err(self.fail("creating event", err)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_task(&mut self) -> Result<(), ActionError> {
        let payload = match self.task_form.draft().validate() {
            Ok(payload) => payload,
            Err(err) => return Err(self.reject(err)),
        };
        match self.api.create_task(&payload).await {
            Ok(task) => {
                self.tasks.push(task);
                self.task_form.complete();
                self.succeed("Task assigned successfully!");
                Ok(())
            }
            Err(err) => Err(self.fail("assigning task", err)),
        }
    }

    /// Records attendance for every selected volunteer, then refetches the
    /// attendance list so it carries the ids the backend assigned.
    #[tracing::instrument(skip(self))]
    pub async fn submit_attendance(&mut self) -> Result<(), ActionError> {
        let batch = match self.attendance_form.draft().validate() {
            Ok(batch) => batch,
            Err(err) => return Err(self.reject(err)),
        };
        let count = batch.records.len();
        let refreshed = match self.api.create_attendance_batch(&batch).await {
            Ok(_) => self.api.list_attendance().await,
            Err(err) => Err(err),
        };
        match refreshed {
            Ok(attendance) => {
                self.attendance = attendance;
                self.attendance_form.complete();
                self.succeed(format!("Attendance added for {count} volunteer(s)!"));
                Ok(())
            }
            Err(err) => Err(self.fail("adding attendance", err)),
        }
    }

    pub fn request_volunteer_deletion(&mut self, id: RecordId) {
        self.pending_deletion = Some(PendingDeletion::Volunteer(id));
    }

    pub fn request_event_deletion(&mut self, id: RecordId) {
        self.pending_deletion = Some(PendingDeletion::Event(id));
    }

    pub fn request_task_deletion(&mut self, id: RecordId) {
        self.pending_deletion = Some(PendingDeletion::Task(id));
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.pending_deletion.as_ref()
    }

    pub fn dismiss_deletion(&mut self) {
        self.pending_deletion = None;
    }

    /// Issues the delete awaiting confirmation and drops the record locally.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_deletion(&mut self) -> Result<(), ActionError> {
        let pending = self
            .pending_deletion
            .take()
            .ok_or(ActionError::NothingToConfirm)?;

        match pending {
            PendingDeletion::Volunteer(id) => match self.api.delete_volunteer(&id).await {
                Ok(()) => {
                    self.volunteers.retain(|v| v.id != id);
                    self.succeed("Volunteer deleted successfully!");
                }
                Err(err) => return Err(self.fail("deleting volunteer", err)),
            },
            PendingDeletion::Event(id) => match self.api.delete_event(&id).await {
                Ok(()) => {
                    self.events.retain(|e| e.id != id);
                    self.succeed("Event deleted successfully!");
                }
                Err(err) => return Err(self.fail("deleting event", err)),
            },
            PendingDeletion::Task(id) => match self.api.delete_task(&id).await {
                Ok(()) => {
                    self.tasks.retain(|t| t.id != id);
                    self.succeed("Task deleted successfully!");
                }
                Err(err) => return Err(self.fail("deleting task", err)),
            },
        }
        Ok(())
    }

    /// Moves a task to `status` immediately and tells the backend. If the
    /// backend refuses, the task returns to the status it had before.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_status(
        &mut self,
        id: &RecordId,
        status: TaskStatus,
    ) -> Result<(), ActionError> {
        let previous = self
            .tasks
            .iter_mut()
            .find(|task| task.id == *id)
            .map(|task| task.status.replace(status));

        match self.api.update_task(id, &TaskPatch::status(status)).await {
            Ok(_) => Ok(()),
            Err(err) => {
                if let Some(previous) = previous {
                    if let Some(task) = self.tasks.iter_mut().find(|task| task.id == *id) {
                        task.status = previous;
                    }
                }
                Err(self.fail("updating task", err))
            }
        }
    }
}
