use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_core::model::{NewTask, Priority, TaskPatch, TaskStatus};
use portal_core::{RecordId, Reference, Task};
use sea_orm::*;

use crate::entities::task;
use crate::web::{error_response, internal_error};

pub mod api;

#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    #[error("Task not found")]
    NotFound,
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A status or priority outside the known values.
    #[error("{0} is invalid")]
    InvalidField(&'static str),
    #[error("Only the task status can be changed")]
    StatusOnly,
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        match self {
            TaskServiceError::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            TaskServiceError::MissingField(_) | TaskServiceError::InvalidField(_) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            TaskServiceError::StatusOnly => error_response(StatusCode::FORBIDDEN, self.to_string()),
            TaskServiceError::Database(err) => internal_error(err),
        }
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task {
            id: RecordId::new(model.id),
            event_id: Some(Reference::Bare(RecordId::new(model.event_id))),
            volunteer_id: Some(Reference::Bare(RecordId::new(model.volunteer_id))),
            title: model.title,
            description: model.description,
            priority: Priority::parse(&model.priority),
            status: Some(TaskStatus::parse(&model.status)),
            due_date: model.due_date,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), TaskServiceError> {
    if value.trim().is_empty() {
        return Err(TaskServiceError::MissingField(field));
    }
    Ok(())
}

fn known_status(status: TaskStatus) -> Result<TaskStatus, TaskServiceError> {
    match status {
        TaskStatus::Unrecognized => Err(TaskServiceError::InvalidField("status")),
        status => Ok(status),
    }
}

fn known_priority(priority: Priority) -> Result<Priority, TaskServiceError> {
    match priority {
        Priority::Unrecognized => Err(TaskServiceError::InvalidField("priority")),
        priority => Ok(priority),
    }
}

pub struct TaskService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, TaskServiceError> {
        let models = task::Entity::find().all(self.db).await?;
        Ok(models.into_iter().map(Task::from).collect())
    }

    /// Assigns a task; status defaults to `pending`.
    #[tracing::instrument(skip(self, new), fields(title = %new.title))]
    pub async fn create(&self, new: NewTask) -> Result<Task, TaskServiceError> {
        require("eventId", new.event_id.as_str())?;
        require("volunteerId", new.volunteer_id.as_str())?;
        require("title", &new.title)?;
        let priority = known_priority(new.priority)?;
        let status = known_status(new.status.unwrap_or(TaskStatus::Pending))?;

        let active_model = task::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            event_id: Set(new.event_id.to_string()),
            volunteer_id: Set(new.volunteer_id.to_string()),
            title: Set(new.title),
            description: Set(new.description),
            priority: Set(priority.as_str().to_string()),
            status: Set(status.as_str().to_string()),
            due_date: Set(new.due_date.filter(|date| !date.is_empty())),
        };
        let created = active_model.insert(self.db).await?;
        tracing::info!(task_id = %created.id, volunteer_id = %created.volunteer_id, "Task assigned");
        Ok(Task::from(created))
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, TaskServiceError> {
        let model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::NotFound)?;
        let mut active_model: task::ActiveModel = model.into();

        if let Some(event_id) = patch.event_id {
            require("eventId", event_id.as_str())?;
            active_model.event_id = Set(event_id.to_string());
        }
        if let Some(volunteer_id) = patch.volunteer_id {
            require("volunteerId", volunteer_id.as_str())?;
            active_model.volunteer_id = Set(volunteer_id.to_string());
        }
        if let Some(title) = patch.title {
            require("title", &title)?;
            active_model.title = Set(title);
        }
        if let Some(description) = patch.description {
            active_model.description = Set(description);
        }
        if let Some(priority) = patch.priority {
            let priority = known_priority(priority)?;
            active_model.priority = Set(priority.as_str().to_string());
        }
        if let Some(status) = patch.status {
            let status = known_status(status)?;
            active_model.status = Set(status.as_str().to_string());
        }
        if let Some(due_date) = patch.due_date {
            active_model.due_date = Set(Some(due_date).filter(|date| !date.is_empty()));
        }

        let updated = active_model.update(self.db).await?;
        tracing::info!(task_id = id, status = %updated.status, "Task updated");
        Ok(Task::from(updated))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), TaskServiceError> {
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::NotFound);
        }
        Ok(())
    }
}
