//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A persisted user account.
///
/// Does not derive `Serialize` on purpose: the password hash must never end
/// up in a response body. Handlers expose `auth::models::UserInfo` instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a new user row.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A persisted check-in entry.
#[derive(Debug, Clone, FromRow)]
pub struct CheckIn {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a new check-in row.
#[derive(Debug, Clone)]
pub struct CreateCheckIn {
    pub id: String,
    pub username: String,
}
