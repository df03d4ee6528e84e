//! Module for check-in API endpoints.
//!
//! This module handles functionalities related to the check-in log.

pub mod handlers;
pub mod models;
pub mod routes;
