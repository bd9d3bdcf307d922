use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_core::model::{NewVolunteer, VolunteerPatch, VolunteerStatus};
use portal_core::{RecordId, Volunteer};
use sea_orm::*;

use crate::entities::volunteer;
use crate::web::{error_response, internal_error};

pub mod api;

/// Error type for VolunteerService operations.
#[derive(Debug, thiserror::Error)]
pub enum VolunteerServiceError {
    #[error("Volunteer not found")]
    NotFound,
    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// An unknown status, or hours that are negative or not a number.
    #[error("{0} is invalid")]
    InvalidField(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for VolunteerServiceError {
    fn into_response(self) -> Response {
        match self {
            VolunteerServiceError::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            VolunteerServiceError::MissingField(_) | VolunteerServiceError::InvalidField(_) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            VolunteerServiceError::Database(err) => internal_error(err),
        }
    }
}

impl From<volunteer::Model> for Volunteer {
    fn from(model: volunteer::Model) -> Self {
        Volunteer {
            id: RecordId::new(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            skills: model.skills,
            hours: model.hours,
            status: VolunteerStatus::parse(&model.status),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), VolunteerServiceError> {
    if value.trim().is_empty() {
        return Err(VolunteerServiceError::MissingField(field));
    }
    Ok(())
}

pub struct VolunteerService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VolunteerService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Volunteer>, VolunteerServiceError> {
        let models = volunteer::Entity::find().all(self.db).await?;
        Ok(models.into_iter().map(Volunteer::from).collect())
    }

    /// Registers a volunteer with zero hours and `active` status.
    #[tracing::instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewVolunteer) -> Result<Volunteer, VolunteerServiceError> {
        require("name", &new.name)?;
        require("email", &new.email)?;
        require("phone", &new.phone)?;

        let active_model = volunteer::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(new.name),
            email: Set(new.email),
            phone: Set(new.phone),
            address: Set(new.address),
            skills: Set(new.skills),
            hours: Set(0.0),
            status: Set(VolunteerStatus::Active.as_str().to_string()),
            password: Set(new.password.filter(|password| !password.is_empty())),
        };
        let created = active_model.insert(self.db).await?;
        tracing::info!(volunteer_id = %created.id, "Volunteer created");
        Ok(Volunteer::from(created))
    }

    /// Applies the fields present in `patch`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: &str,
        patch: VolunteerPatch,
    ) -> Result<Volunteer, VolunteerServiceError> {
        let model = volunteer::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(VolunteerServiceError::NotFound)?;
        let mut active_model: volunteer::ActiveModel = model.into();

        if let Some(name) = patch.name {
            require("name", &name)?;
            active_model.name = Set(name);
        }
        if let Some(email) = patch.email {
            require("email", &email)?;
            active_model.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            active_model.phone = Set(phone);
        }
        if let Some(address) = patch.address {
            active_model.address = Set(address);
        }
        if let Some(skills) = patch.skills {
            active_model.skills = Set(skills);
        }
        if let Some(hours) = patch.hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(VolunteerServiceError::InvalidField("hours"));
            }
            active_model.hours = Set(hours);
        }
        if let Some(status) = patch.status {
            if status == VolunteerStatus::Unrecognized {
                return Err(VolunteerServiceError::InvalidField("status"));
            }
            active_model.status = Set(status.as_str().to_string());
        }
        if let Some(password) = patch.password {
            active_model.password = Set(Some(password).filter(|password| !password.is_empty()));
        }

        let updated = active_model.update(self.db).await?;
        Ok(Volunteer::from(updated))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), VolunteerServiceError> {
        let result = volunteer::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(VolunteerServiceError::NotFound);
        }
        tracing::info!(volunteer_id = id, "Volunteer deleted");
        Ok(())
    }

    /// Looks up the stored record, password included, for sign-in.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<volunteer::Model>, VolunteerServiceError> {
        let model = volunteer::Entity::find()
            .filter(volunteer::Column::Email.eq(email))
            .one(self.db)
            .await?;
        Ok(model)
    }
}

/// Adds `hours` to a volunteer's running total. Unknown ids are skipped and
/// reported as `false`.
pub(crate) async fn add_hours<C: ConnectionTrait>(
    db: &C,
    id: &str,
    hours: f64,
) -> Result<bool, DbErr> {
    let Some(model) = volunteer::Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    let total = model.hours + hours;
    let mut active_model: volunteer::ActiveModel = model.into();
    active_model.hours = Set(total);
    active_model.update(db).await?;
    Ok(true)
}
