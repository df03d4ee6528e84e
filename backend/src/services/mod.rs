//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between different parts of the
//! application, such as account management and the check-in log.

pub mod account_service;
pub mod checkin_service;
