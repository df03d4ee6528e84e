//! Check-in business logic service.
//!
//! Records daily check-ins for registered users and reports per-user
//! check-in counts.

use crate::api::checkin::models::CheckInRequest;
use crate::database::models::{CheckIn, CreateCheckIn};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::checkin_repository::CheckInRepository;
use crate::repositories::user_repository::{SqliteUserRepository, UserRepository};
use crate::utils::generate_random_string::generate_random_string;
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

/// Service layer for check-in operations.
pub struct CheckInService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> CheckInService<'a> {
    /// Creates a new CheckInService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a check-in for a registered username.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Missing username
    /// - Username not registered
    /// - Persistence failures
    pub async fn record_check_in(&self, request: CheckInRequest) -> ServiceResult<CheckIn> {
        // Input validation using validator crate
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        self.require_registered(&request.username).await?;

        let check_in = CheckInRepository::new(self.pool)
            .insert_check_in(CreateCheckIn {
                id: Self::generate_check_in_id(),
                username: request.username,
            })
            .await?;

        tracing::info!(check_in_id = %check_in.id, "Recorded check-in");
        Ok(check_in)
    }

    /// Counts the check-ins recorded for a registered username.
    pub async fn check_in_count(&self, username: &str) -> ServiceResult<i64> {
        self.require_registered(username).await?;

        CheckInRepository::new(self.pool)
            .count_for_username(username)
            .await
    }

    async fn require_registered(&self, username: &str) -> ServiceResult<()> {
        let users = SqliteUserRepository::new(self.pool.clone());
        if users.find_by_username(username).await?.is_none() {
            return Err(ServiceError::validation("Username is not registered"));
        }

        Ok(())
    }

    /// Check-in ids carry the check-in date plus a random suffix,
    /// e.g. `2026-08-07-Ab3dEf9h`.
    fn generate_check_in_id() -> String {
        format!(
            "{}-{}",
            Utc::now().format("%Y-%m-%d"),
            generate_random_string(8)
        )
    }
}
