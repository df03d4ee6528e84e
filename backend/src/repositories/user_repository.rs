//! Database repository for user account persistence.
//!
//! The `UserRepository` trait is the seam between the account service and
//! the store. The production implementation is backed by SQLite; an
//! in-memory implementation is provided for tests and local development.

use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistence operations for the User entity.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Retrieves a user by their username.
    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>>;

    /// Retrieves a user by their email. If several rows share the email
    /// (uniqueness not enforced by policy), the oldest one wins.
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// Inserts a new user, failing with `AlreadyExists` when the username
    /// is taken. The check and the insert are a single atomic step: of any
    /// number of concurrent inserts with the same username, exactly one
    /// succeeds.
    async fn insert_unique(&self, user: CreateUser) -> ServiceResult<User>;

    /// Replaces the stored password hash in one atomic update.
    async fn update_password_hash(&self, id: &str, password_hash: &str) -> ServiceResult<()>;
}

/// SQLite-backed implementation of `UserRepository`.
///
/// Uniqueness of usernames is delegated to the UNIQUE constraint on the
/// `users` table, so `insert_unique` never has to read before writing.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool handle
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users WHERE email = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_unique(&self, user: CreateUser) -> ServiceResult<User> {
        let now = Utc::now();

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
                Err(ServiceError::already_exists("User", &user.username))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> ServiceResult<()> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// In-memory implementation of `UserRepository` (for tests/development).
///
/// The write lock is held across the uniqueness check and the insert, which
/// gives the same one-winner guarantee the UNIQUE constraint provides in
/// SQLite.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let users = self.users.read().await;
        let mut matches: Vec<&User> = users.values().filter(|u| u.email == email).collect();
        matches.sort_by_key(|u| u.created_at);
        Ok(matches.first().map(|u| (*u).clone()))
    }

    async fn insert_unique(&self, user: CreateUser) -> ServiceResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(ServiceError::already_exists("User", &user.username));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id.clone(), created.clone());

        Ok(created)
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> ServiceResult<()> {
        let mut users = self.users.write().await;

        if let Some(user) = users.get_mut(id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }

        Ok(())
    }
}
