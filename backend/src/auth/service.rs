//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::{SqliteUserRepository, UserRepository};
use crate::services::account_service::{AccountPolicy, AccountService};
use crate::utils::jwt::{Claims, JwtUtils};
use crate::utils::password::PasswordHasher;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for handling registration, login, password
/// changes, and token generation.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    config: Config,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool) -> ServiceResult<Self> {
        let config = Config::from_env()?;
        let jwt_utils = JwtUtils::new(&config);

        Ok(AuthService {
            pool,
            jwt_utils,
            config,
        })
    }

    /// Register a new user account
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserInfo> {
        let user = self.account_service().register(request).await?;
        Ok(user.into())
    }

    /// Authenticate a user and generate JWT tokens
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        // Validate input
        if let Err(validation_errors) = login_request.validate() {
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

        // Verify credentials using the account service
        let user = self
            .account_service()
            .authenticate(&login_request.identifier, &login_request.password)
            .await?;

        let access_token = self.jwt_utils.generate_token(&user)?;
        let refresh_token = self.jwt_utils.generate_refresh_token(&user)?;
        let expires_in = self.config.jwt_expires_in_seconds;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: user.into(),
            expires_in,
        })
    }

    /// Rotate a user's password
    pub async fn change_password(&self, request: ChangePasswordRequest) -> ServiceResult<()> {
        self.account_service().change_password(request).await
    }

    /// Resolve the current user from validated token claims
    pub async fn current_user(&self, claims: &Claims) -> ServiceResult<UserInfo> {
        let user = SqliteUserRepository::new(self.pool.clone())
            .find_by_username(&claims.username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &claims.username))?;

        Ok(user.into())
    }

    fn account_service(&self) -> AccountService<SqliteUserRepository> {
        AccountService::new(
            SqliteUserRepository::new(self.pool.clone()),
            PasswordHasher::new(self.config.bcrypt_cost),
            AccountPolicy::from(&self.config),
        )
    }
}
