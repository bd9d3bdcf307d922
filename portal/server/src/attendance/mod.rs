use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_core::model::{AttendanceStatus, BatchReceipt, NewAttendance};
use portal_core::{AttendanceRecord, RecordId, Reference};
use sea_orm::*;

use crate::entities::attendance;
use crate::volunteer::add_hours;
use crate::web::{error_response, internal_error};

pub mod api;

#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("No records provided")]
    EmptyBatch,
    #[error("{0} is required")]
    MissingField(&'static str),
    /// An unknown status, or hours that are negative or not a number.
    #[error("{0} is invalid")]
    InvalidField(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        match self {
            AttendanceServiceError::EmptyBatch
            | AttendanceServiceError::MissingField(_)
            | AttendanceServiceError::InvalidField(_) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            AttendanceServiceError::Database(err) => internal_error(err),
        }
    }
}

impl From<attendance::Model> for AttendanceRecord {
    fn from(model: attendance::Model) -> Self {
        AttendanceRecord {
            id: RecordId::new(model.id),
            date: model.date,
            event_id: Some(Reference::Bare(RecordId::new(model.event_id))),
            volunteer_id: Some(Reference::Bare(RecordId::new(model.volunteer_id))),
            status: AttendanceStatus::parse(&model.status),
            hours: model.hours,
        }
    }
}

fn validate(record: &NewAttendance) -> Result<(), AttendanceServiceError> {
    for (field, value) in [
        ("date", record.date.as_str()),
        ("eventId", record.event_id.as_str()),
        ("volunteerId", record.volunteer_id.as_str()),
    ] {
        if value.trim().is_empty() {
            return Err(AttendanceServiceError::MissingField(field));
        }
    }
    if record.status == AttendanceStatus::Unrecognized {
        return Err(AttendanceServiceError::InvalidField("status"));
    }
    if !record.hours.is_finite() || record.hours < 0.0 {
        return Err(AttendanceServiceError::InvalidField("hours"));
    }
    Ok(())
}

pub struct AttendanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AttendanceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = attendance::Entity::find().all(self.db).await?;
        Ok(models.into_iter().map(AttendanceRecord::from).collect())
    }

    /// Stores a batch of attendance records in one transaction.
    ///
    /// Every `present` record with positive hours adds those hours to its
    /// volunteer. Records naming an unknown volunteer are still stored.
    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    pub async fn create_batch(
        &self,
        records: Vec<NewAttendance>,
    ) -> Result<BatchReceipt, AttendanceServiceError> {
        if records.is_empty() {
            return Err(AttendanceServiceError::EmptyBatch);
        }
        records.iter().try_for_each(validate)?;

        let txn = self.db.begin().await?;
        let mut inserted_ids = Vec::with_capacity(records.len());

        for record in records {
            let active_model = attendance::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                date: Set(record.date),
                event_id: Set(record.event_id.to_string()),
                volunteer_id: Set(record.volunteer_id.to_string()),
                status: Set(record.status.as_str().to_string()),
                hours: Set(record.hours),
            };
            let created = active_model.insert(&txn).await?;

            if record.status == AttendanceStatus::Present && record.hours > 0.0 {
                let credited = add_hours(&txn, &created.volunteer_id, record.hours).await?;
                if !credited {
                    tracing::warn!(
                        volunteer_id = %created.volunteer_id,
                        "Attendance recorded for an unknown volunteer"
                    );
                }
            }
            inserted_ids.push(RecordId::new(created.id));
        }

        txn.commit().await?;
        tracing::info!(inserted = inserted_ids.len(), "Attendance batch stored");

        Ok(BatchReceipt {
            message: "Attendance added".to_string(),
            inserted_ids,
        })
    }
}
