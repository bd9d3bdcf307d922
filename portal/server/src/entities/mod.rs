//! Database tables. Ids are UUID strings assigned on insert; statuses and
//! priorities are stored as their wire strings.
pub mod attendance;
pub mod event;
pub mod task;
pub mod volunteer;
