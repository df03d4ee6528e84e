//! Data access layer for persisted entities.
//!
//! Repositories own the SQL for their entity and translate database
//! failures into service errors; business rules live in the services.

pub mod checkin_repository;
pub mod user_repository;
