//! Database repository for check-in log operations.

use crate::database::models::{CheckIn, CreateCheckIn};
use crate::errors::ServiceResult;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for check-in database operations.
pub struct CheckInRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CheckInRepository<'a> {
    /// Creates a new CheckInRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new check-in entry.
    pub async fn insert_check_in(&self, check_in: CreateCheckIn) -> ServiceResult<CheckIn> {
        let created = sqlx::query_as::<_, CheckIn>(
            r#"
            INSERT INTO check_ins (id, username, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, created_at
            "#,
        )
        .bind(&check_in.id)
        .bind(&check_in.username)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Counts the check-ins recorded for a username.
    pub async fn count_for_username(&self, username: &str) -> ServiceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM check_ins WHERE username = ?",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
