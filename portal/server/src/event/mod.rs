use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_core::model::{EventPatch, EventStatus, NewEvent};
use portal_core::{Event, RecordId};
use sea_orm::*;

use crate::entities::event;
use crate::web::{error_response, internal_error};

pub mod api;

#[derive(Debug, thiserror::Error)]
pub enum EventServiceError {
    #[error("Event not found")]
    NotFound,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} is invalid")]
    InvalidField(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for EventServiceError {
    fn into_response(self) -> Response {
        match self {
            EventServiceError::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            EventServiceError::MissingField(_) | EventServiceError::InvalidField(_) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            EventServiceError::Database(err) => internal_error(err),
        }
    }
}

impl From<event::Model> for Event {
    fn from(model: event::Model) -> Self {
        Event {
            id: RecordId::new(model.id),
            name: model.name,
            date: model.date,
            location: model.location,
            description: model.description,
            required_volunteers: u32::try_from(model.required_volunteers).unwrap_or_default(),
            status: EventStatus::parse(&model.status),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), EventServiceError> {
    if value.trim().is_empty() {
        return Err(EventServiceError::MissingField(field));
    }
    Ok(())
}

fn known_status(status: EventStatus) -> Result<EventStatus, EventServiceError> {
    match status {
        EventStatus::Unrecognized => Err(EventServiceError::InvalidField("status")),
        status => Ok(status),
    }
}

fn stored_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

pub struct EventService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EventService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Event>, EventServiceError> {
        let models = event::Entity::find().all(self.db).await?;
        Ok(models.into_iter().map(Event::from).collect())
    }

    /// Creates an event; status defaults to `upcoming`.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewEvent) -> Result<Event, EventServiceError> {
        require("name", &new.name)?;
        require("date", &new.date)?;
        require("location", &new.location)?;

        let status = known_status(new.status.unwrap_or(EventStatus::Upcoming))?;
        let active_model = event::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(new.name),
            date: Set(new.date),
            location: Set(new.location),
            description: Set(new.description),
            required_volunteers: Set(stored_count(new.required_volunteers)),
            status: Set(status.as_str().to_string()),
        };
        let created = active_model.insert(self.db).await?;
        tracing::info!(event_id = %created.id, "Event created");
        Ok(Event::from(created))
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<Event, EventServiceError> {
        let model = event::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(EventServiceError::NotFound)?;
        let mut active_model: event::ActiveModel = model.into();

        if let Some(name) = patch.name {
            require("name", &name)?;
            active_model.name = Set(name);
        }
        if let Some(date) = patch.date {
            require("date", &date)?;
            active_model.date = Set(date);
        }
        if let Some(location) = patch.location {
            active_model.location = Set(location);
        }
        if let Some(description) = patch.description {
            active_model.description = Set(description);
        }
        if let Some(count) = patch.required_volunteers {
            active_model.required_volunteers = Set(stored_count(count));
        }
        if let Some(status) = patch.status {
            let status = known_status(status)?;
            active_model.status = Set(status.as_str().to_string());
        }

        let updated = active_model.update(self.db).await?;
        Ok(Event::from(updated))
    }

    /// Removes the event. Tasks and attendance pointing at it are kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), EventServiceError> {
        let result = event::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(EventServiceError::NotFound);
        }
        tracing::info!(event_id = id, "Event deleted");
        Ok(())
    }
}
