//! Derived counts and views over a snapshot of fetched entities.
//!
//! Every function here is a pure reduction or a stable filter over the slices it
//! is given. Callers recompute after each fetch instead of caching results.

use crate::model::{
    AttendanceRecord, AttendanceStatus, Event, EventStatus, Task, TaskStatus, Volunteer,
    VolunteerStatus,
};
use crate::reconcile::{AssignedTask, VolunteerEvent};

/// Number of rows shown in the dashboard preview lists.
pub const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolunteerStats {
    pub total: usize,
    pub active: usize,
    pub total_hours: f64,
}

pub fn volunteer_stats(volunteers: &[Volunteer]) -> VolunteerStats {
    VolunteerStats {
        total: volunteers.len(),
        active: volunteers
            .iter()
            .filter(|v| v.status == VolunteerStatus::Active)
            .count(),
        total_hours: volunteers.iter().map(|v| v.hours).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventStats {
    pub upcoming: usize,
}

pub fn event_stats(events: &[Event]) -> EventStats {
    EventStats {
        upcoming: events
            .iter()
            .filter(|e| e.status == EventStatus::Upcoming)
            .count(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub pending: usize,
    pub completed: usize,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let with_status = |status| tasks.iter().filter(|t| t.status == Some(status)).count();
    TaskStats {
        pending: with_status(TaskStatus::Pending),
        completed: with_status(TaskStatus::Completed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttendanceStats {
    pub sessions: usize,
    pub present: usize,
    pub total_hours: f64,
}

pub fn attendance_stats<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> AttendanceStats {
    records
        .into_iter()
        .fold(AttendanceStats::default(), |mut stats, record| {
            stats.sessions += 1;
            if record.status == AttendanceStatus::Present {
                stats.present += 1;
            }
            stats.total_hours += record.hours;
            stats
        })
}

/// The stat cards on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardStats {
    pub volunteers: VolunteerStats,
    pub events: EventStats,
    pub tasks: TaskStats,
}

pub fn dashboard_stats(volunteers: &[Volunteer], events: &[Event], tasks: &[Task]) -> DashboardStats {
    DashboardStats {
        volunteers: volunteer_stats(volunteers),
        events: event_stats(events),
        tasks: task_stats(tasks),
    }
}

/// Kanban columns. `unsorted` holds tasks with a missing or unrecognized status
/// so that they are reported rather than silently dropped from the board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskBoard<'a> {
    pub pending: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
    pub unsorted: Vec<&'a Task>,
}

impl<'a> TaskBoard<'a> {
    pub fn partition(tasks: &'a [Task]) -> Self {
        let mut board = TaskBoard::default();
        for task in tasks {
            match task.status {
                Some(TaskStatus::Pending) => board.pending.push(task),
                Some(TaskStatus::InProgress) => board.in_progress.push(task),
                Some(TaskStatus::Completed) => board.completed.push(task),
                Some(TaskStatus::Unrecognized) | None => board.unsorted.push(task),
            }
        }
        board
    }

    /// The three board columns in display order.
    pub fn columns(&self) -> [(TaskStatus, &[&'a Task]); 3] {
        [
            (TaskStatus::Pending, self.pending.as_slice()),
            (TaskStatus::InProgress, self.in_progress.as_slice()),
            (TaskStatus::Completed, self.completed.as_slice()),
        ]
    }

    pub fn has_gaps(&self) -> bool {
        !self.unsorted.is_empty()
    }
}

/// Volunteers whose name or email contains `term`, ignoring case.
pub fn search_volunteers<'a>(volunteers: &'a [Volunteer], term: &str) -> Vec<&'a Volunteer> {
    let needle = term.to_lowercase();
    volunteers
        .iter()
        .filter(|v| {
            v.name.to_lowercase().contains(&needle) || v.email.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn volunteer_preview(volunteers: &[Volunteer]) -> &[Volunteer] {
    &volunteers[..volunteers.len().min(PREVIEW_LIMIT)]
}

pub fn upcoming_events(events: &[Event]) -> impl Iterator<Item = &Event> {
    events.iter().filter(|e| e.status == EventStatus::Upcoming)
}

pub fn upcoming_preview(events: &[Event]) -> Vec<&Event> {
    upcoming_events(events).take(PREVIEW_LIMIT).collect()
}

/// The stat boxes on a volunteer's own dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverviewStats {
    pub total_hours: f64,
    pub events_attended: usize,
    pub tasks_completed: usize,
    pub open_tasks: usize,
    pub upcoming_events: usize,
}

pub fn overview_stats(
    hours: f64,
    my_tasks: &[AssignedTask],
    my_events: &[VolunteerEvent],
    attendance: &AttendanceStats,
) -> OverviewStats {
    let completed = my_tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    OverviewStats {
        total_hours: hours,
        events_attended: attendance.present,
        tasks_completed: completed,
        open_tasks: my_tasks.len() - completed,
        upcoming_events: my_events
            .iter()
            .filter(|e| e.status == EventStatus::Upcoming)
            .count(),
    }
}
