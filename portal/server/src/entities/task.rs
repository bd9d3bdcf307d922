//! Task entity. `event_id` and `volunteer_id` are plain references; deleting the
//! event or volunteer leaves the task in place.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub event_id: String,
    pub volunteer_id: String,
    pub title: String,
    pub description: String,
    /// `low`, `medium` or `high`
    pub priority: String,
    /// `pending`, `in-progress` or `completed`
    pub status: String,
    pub due_date: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
