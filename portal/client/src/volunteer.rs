//! A volunteer's own dashboard.
//!
//! Tasks and events come from the live lists and are reconciled against the
//! signed-in volunteer. Attendance history and reports are held separately and
//! never feed into that reconciliation.

use chrono::Utc;
use portal_core::forms::ReportDraft;
use portal_core::reconcile::{
    AssignedTask, VolunteerEvent, Viewer, attendance_for_volunteer, tasks_for_volunteer,
    volunteer_events,
};
use portal_core::stats::{AttendanceStats, OverviewStats, attendance_stats, overview_stats};
use portal_core::{AttendanceRecord, Notifications, Report, ValidationError};
use tracing::{error, info};

use crate::api::{ApiError, PortalApi};
use crate::session::Session;

/// Event name used for a report when the volunteer has no events.
pub const GENERAL_REPORT: &str = "General Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolunteerTab {
    #[default]
    Overview,
    Events,
    Tasks,
    Attendance,
    Reports,
}

pub struct VolunteerDashboard<'a, API: PortalApi> {
    api: &'a API,
    viewer: Viewer,
    name: String,
    hours: f64,
    tasks: Vec<AssignedTask>,
    events: Vec<VolunteerEvent>,
    attendance: Vec<AttendanceRecord>,
    reports: Vec<Report>,
    loading: bool,
    error: Option<String>,
    pub tab: VolunteerTab,
    pub report_form: ReportDraft,
    pub notifications: Notifications,
}

impl<'a, API: PortalApi> VolunteerDashboard<'a, API> {
    pub fn new(api: &'a API, session: &Session) -> Self {
        Self {
            api,
            viewer: session.viewer(),
            name: session.user.name.clone(),
            hours: session.user.hours,
            tasks: Vec::new(),
            events: Vec::new(),
            attendance: Vec::new(),
            reports: Vec::new(),
            loading: true,
            error: None,
            tab: VolunteerTab::default(),
            report_form: ReportDraft::default(),
            notifications: Notifications::default(),
        }
    }

    /// Fetches tasks and events together and keeps the tasks assigned to this
    /// volunteer.
    #[tracing::instrument(skip(self), fields(volunteer = %self.name))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let fetched = tokio::try_join!(self.api.list_tasks(), self.api.list_events());
        self.loading = false;

        let (tasks, events) = fetched.map_err(|err| {
            error!("Error fetching data: {err}");
            self.error = Some("Error loading tasks. Please try again.".to_string());
            err
        })?;
        self.tasks = tasks_for_volunteer(&self.viewer, &tasks, &events);
        self.events = volunteer_events(&events);
        info!(tasks = self.tasks.len(), events = self.events.len(), "Dashboard loaded");
        Ok(())
    }

    /// Fetches this volunteer's attendance history.
    #[tracing::instrument(skip(self), fields(volunteer = %self.name))]
    pub async fn load_attendance(&mut self) -> Result<(), ApiError> {
        let records = self.api.list_attendance().await.map_err(|err| {
            error!("Error fetching attendance: {err}");
            self.error = Some("Error loading attendance. Please try again.".to_string());
            err
        })?;
        self.attendance = attendance_for_volunteer(&self.viewer, &records)
            .into_iter()
            .cloned()
            .collect();
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[AssignedTask] {
        &self.tasks
    }

    pub fn events(&self) -> &[VolunteerEvent] {
        &self.events
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn attendance_summary(&self) -> AttendanceStats {
        attendance_stats(&self.attendance)
    }

    pub fn overview(&self) -> OverviewStats {
        overview_stats(
            self.hours,
            &self.tasks,
            &self.events,
            &self.attendance_summary(),
        )
    }

    /// Files the drafted report at the top of the list. Reports stay on this
    /// side; there is no backend endpoint for them.
    pub fn submit_report(&mut self) -> Result<&Report, ValidationError> {
        let event = self
            .events
            .first()
            .map(|event| event.name.as_str())
            .unwrap_or(GENERAL_REPORT);
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let id = u32::try_from(self.reports.len() + 1).unwrap_or(u32::MAX);

        let report = self.report_form.validate(id, event, &today)?;
        self.reports.insert(0, report);
        self.report_form = ReportDraft::default();
        self.notifications
            .push("Report submitted successfully!", Utc::now());
        Ok(&self.reports[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockPortalApi, SessionUser};
    use portal_core::id::EmbeddedRecord;
    use portal_core::model::{
        AttendanceStatus, EventStatus, Priority, ReportKind, TaskStatus, UserType,
    };
    use portal_core::{Event, RecordId, Reference, Task};

    fn session(id: Option<&str>, alt_id: Option<&str>) -> Session {
        Session {
            token: "jwt".to_string(),
            user: SessionUser {
                id: id.map(RecordId::new),
                alt_id: alt_id.map(RecordId::new),
                email: "asha@example.org".to_string(),
                name: "Asha".to_string(),
                hours: 18.0,
                user_type: UserType::Volunteer,
                ..Default::default()
            },
            user_type: UserType::Volunteer,
        }
    }

    fn event(id: &str, name: &str, status: EventStatus) -> Event {
        Event {
            id: RecordId::new(id),
            name: name.to_string(),
            date: "2025-10-20".to_string(),
            location: "Pune".to_string(),
            description: String::new(),
            required_volunteers: 5,
            status,
        }
    }

    fn task(id: &str, volunteer: Reference, event: &str, status: Option<TaskStatus>) -> Task {
        Task {
            id: RecordId::new(id),
            event_id: Some(event.into()),
            volunteer_id: Some(volunteer),
            title: format!("Task {id}"),
            description: String::new(),
            priority: Priority::Medium,
            status,
            due_date: None,
        }
    }

    fn attendance(id: &str, volunteer: &str, status: AttendanceStatus, hours: f64) -> AttendanceRecord {
        AttendanceRecord {
            id: RecordId::new(id),
            date: "2025-09-15".to_string(),
            event_id: Some("e1".into()),
            volunteer_id: Some(volunteer.into()),
            status,
            hours,
        }
    }

    fn mock_with_lists() -> MockPortalApi {
        let mut api = MockPortalApi::new();
        api.expect_list_tasks().times(1).returning(|| {
            Ok(vec![
                task("t1", "v1".into(), "e1", Some(TaskStatus::Completed)),
                task(
                    "t2",
                    Reference::Embedded(EmbeddedRecord {
                        id: RecordId::new("v1"),
                        name: Some("Asha".to_string()),
                    }),
                    "missing",
                    None,
                ),
                task("t3", "v2".into(), "e1", Some(TaskStatus::Pending)),
            ])
        });
        api.expect_list_events().times(1).returning(|| {
            Ok(vec![
                event("e1", "Awareness Campaign", EventStatus::Upcoming),
                event("e2", "Book Distribution", EventStatus::Completed),
            ])
        });
        api
    }

    #[tokio::test]
    async fn load_keeps_only_this_volunteers_tasks() {
        // Arrange
        let api = mock_with_lists();
        let session = session(None, Some("v1"));
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        // Act
        dashboard.load().await.unwrap();

        // Assert
        let titles: Vec<_> = dashboard.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Task t1", "Task t2"]);
        assert_eq!(dashboard.tasks()[0].event, "Awareness Campaign");
        assert_eq!(dashboard.tasks()[1].event, "Unknown Event");
        assert_eq!(dashboard.tasks()[1].status, TaskStatus::Pending);
        assert_eq!(dashboard.events().len(), 2);
        assert!(dashboard.events().iter().all(|e| e.role == "Volunteer"));
        assert_eq!(dashboard.events()[0].display_date(), "20 Oct 2025");
        assert_eq!(dashboard.events()[0].day(), Some(20));
    }

    #[tokio::test]
    async fn viewer_without_identity_sees_no_tasks() {
        let api = mock_with_lists();
        let session = session(None, None);
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        dashboard.load().await.unwrap();

        assert!(dashboard.tasks().is_empty());
    }

    #[tokio::test]
    async fn failed_load_shows_retry_message() {
        let mut api = MockPortalApi::new();
        api.expect_list_tasks().returning(|| {
            Err(ApiError::Backend {
                status: 401,
                message: "Token has expired".to_string(),
            })
        });
        api.expect_list_events().returning(|| Ok(Vec::new()));
        let session = session(Some("v1"), None);
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        let result = dashboard.load().await;

        assert!(result.unwrap_err().is_unauthorized());
        assert_eq!(
            dashboard.error(),
            Some("Error loading tasks. Please try again.")
        );
    }

    #[tokio::test]
    async fn overview_combines_tasks_events_and_attendance() {
        let mut api = mock_with_lists();
        api.expect_list_attendance().times(1).returning(|| {
            Ok(vec![
                attendance("a1", "v1", AttendanceStatus::Present, 6.0),
                attendance("a2", "v1", AttendanceStatus::Present, 4.0),
                attendance("a3", "v1", AttendanceStatus::Absent, 0.0),
                attendance("a4", "v2", AttendanceStatus::Present, 8.0),
            ])
        });
        let session = session(Some("v1"), None);
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        dashboard.load().await.unwrap();
        dashboard.load_attendance().await.unwrap();

        let summary = dashboard.attendance_summary();
        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.total_hours, 10.0);

        let overview = dashboard.overview();
        assert_eq!(overview.total_hours, 18.0);
        assert_eq!(overview.events_attended, 2);
        assert_eq!(overview.tasks_completed, 1);
        assert_eq!(overview.open_tasks, 1);
        assert_eq!(overview.upcoming_events, 1);
    }

    #[test]
    fn reports_are_filed_newest_first() {
        let api = MockPortalApi::new();
        let session = session(Some("v1"), None);
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        dashboard.report_form.text = "Distributed 40 books".to_string();
        dashboard.submit_report().unwrap();
        dashboard.report_form.file = Some("stall.jpg".to_string());
        dashboard.submit_report().unwrap();

        let reports = dashboard.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].id, 2);
        assert_eq!(reports[0].kind, ReportKind::Photo);
        assert_eq!(reports[0].event, GENERAL_REPORT);
        assert_eq!(reports[1].kind, ReportKind::Text);
        assert_eq!(dashboard.report_form, ReportDraft::default());
    }

    #[test]
    fn empty_report_is_rejected() {
        let api = MockPortalApi::new();
        let session = session(Some("v1"), None);
        let mut dashboard = VolunteerDashboard::new(&api, &session);

        assert_eq!(
            dashboard.submit_report().unwrap_err(),
            ValidationError::EmptyReport
        );
        assert!(dashboard.reports().is_empty());
    }
}
