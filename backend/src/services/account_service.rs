//! Account business logic service.
//!
//! Owns the user account lifecycle: registration with uniqueness
//! enforcement, credential verification, and credential rotation. The
//! persistence backend and the hashing cost are injected, so the rules in
//! here can be exercised without a real database.

use crate::auth::models::{ChangePasswordRequest, RegisterRequest};
use crate::config::{Config, LoginIdentifier};
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::password::{DUMMY_HASH, PasswordHasher};
use uuid::Uuid;
use validator::Validate;

/// Account policy switches that differ between deployments.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Field used to look up an account at login time.
    pub login_identifier: LoginIdentifier,
    /// Whether registration rejects an already-registered email.
    pub enforce_email_uniqueness: bool,
    /// Whether passwords must also contain a punctuation character.
    pub require_password_symbol: bool,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            login_identifier: LoginIdentifier::Username,
            enforce_email_uniqueness: true,
            require_password_symbol: false,
        }
    }
}

impl From<&Config> for AccountPolicy {
    fn from(config: &Config) -> Self {
        Self {
            login_identifier: config.login_identifier,
            enforce_email_uniqueness: config.enforce_email_uniqueness,
            require_password_symbol: config.require_password_symbol,
        }
    }
}

/// Service layer for account operations.
pub struct AccountService<R: UserRepository> {
    repository: R,
    hasher: PasswordHasher,
    policy: AccountPolicy,
}

impl<R: UserRepository> AccountService<R> {
    /// Creates a new AccountService instance.
    ///
    /// # Arguments
    /// * `repository` - User persistence backend
    /// * `hasher` - Password hashing collaborator
    /// * `policy` - Deployment account policy
    pub fn new(repository: R, hasher: PasswordHasher, policy: AccountPolicy) -> Self {
        Self {
            repository,
            hasher,
            policy,
        }
    }

    /// Registers a new user account.
    ///
    /// Validation short-circuits on the first failure, each with its own
    /// reported reason: field presence, username shape, email shape,
    /// password strength, confirmation match, then uniqueness. Username
    /// uniqueness is enforced by the repository's atomic insert, so two
    /// concurrent registrations with the same username cannot both succeed.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - Username or email already registered
    /// - Persistence failures
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
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

        Self::validate_username_shape(&request.username)?;
        Self::validate_email_shape(&request.email)?;
        self.validate_password_strength(&request.password)?;

        if request.password != request.confirm_password {
            return Err(ServiceError::validation(
                "Password confirmation does not match",
            ));
        }

        // The pre-check gives the conflict a precise reason; the atomic
        // insert below is what actually guarantees a single winner when
        // registrations race.
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ServiceError::already_exists("User", &request.username));
        }

        if self.policy.enforce_email_uniqueness
            && self
                .repository
                .find_by_email(&request.email)
                .await?
                .is_some()
        {
            return Err(ServiceError::already_exists("Email", &request.email));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .insert_unique(CreateUser {
                id: Uuid::now_v7().to_string(),
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");
        Ok(user)
    }

    /// Verifies a login attempt against the stored credentials.
    ///
    /// The lookup field follows the configured login policy. An unknown
    /// identifier and a wrong password both return the same
    /// `InvalidCredentials` value; the unknown-identifier path burns a
    /// bcrypt verification so it costs the same as a mismatch.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> ServiceResult<User> {
        let user = match self.policy.login_identifier {
            LoginIdentifier::Username => self.repository.find_by_username(identifier).await?,
            LoginIdentifier::Email => self.repository.find_by_email(identifier).await?,
        };

        let Some(user) = user else {
            let _ = self.hasher.verify(password, DUMMY_HASH);
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Rotates a user's password.
    ///
    /// The new password must satisfy the same strength policy as
    /// registration. The stored hash is swapped in a single update, so a
    /// concurrent login sees either the old or the new credential, never
    /// a partial state.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Unknown username
    /// - Incorrect old password (distinct from the login error)
    /// - Validation failures on the new password
    pub async fn change_password(&self, request: ChangePasswordRequest) -> ServiceResult<()> {
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

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &request.username))?;

        if !self.hasher.verify(&request.old_password, &user.password_hash)? {
            return Err(ServiceError::validation("Old password is incorrect"));
        }

        self.validate_password_strength(&request.new_password)?;

        if request.new_password != request.confirm_new_password {
            return Err(ServiceError::validation(
                "Password confirmation does not match",
            ));
        }

        let password_hash = self.hasher.hash(&request.new_password)?;
        self.repository
            .update_password_hash(&user.id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Usernames are ASCII alphanumeric, at least 3 characters.
    fn validate_username_shape(username: &str) -> ServiceResult<()> {
        let valid = username.len() >= 3 && username.chars().all(|c| c.is_ascii_alphanumeric());

        if !valid {
            return Err(ServiceError::validation(
                "Username must be at least 3 alphanumeric characters",
            ));
        }

        Ok(())
    }

    /// Emails must look like `local@domain` with a dotted domain and no
    /// whitespace. Deliverability is not checked here.
    fn validate_email_shape(email: &str) -> ServiceResult<()> {
        let valid = !email.chars().any(char::is_whitespace)
            && match email.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty()
                        && domain.contains('.')
                        && !domain.starts_with('.')
                        && !domain.ends_with('.')
                }
                None => false,
            };

        if !valid {
            return Err(ServiceError::validation("Email address is not valid"));
        }

        Ok(())
    }

    /// Passwords are at least 8 characters with a letter and a digit; the
    /// symbol requirement is a policy switch.
    fn validate_password_strength(&self, password: &str) -> ServiceResult<()> {
        if password.len() < 8
            || !password.chars().any(|c| c.is_ascii_alphabetic())
            || !password.chars().any(|c| c.is_ascii_digit())
        {
            return Err(ServiceError::validation(
                "Password must be at least 8 characters and contain a letter and a digit",
            ));
        }

        if self.policy.require_password_symbol
            && !password.chars().any(|c| c.is_ascii_punctuation())
        {
            return Err(ServiceError::validation(
                "Password must contain at least one symbol",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::InMemoryUserRepository;

    // Production cost comes from config; 4 keeps the tests fast.
    const TEST_COST: u32 = 4;

    fn service_with(
        repository: InMemoryUserRepository,
        policy: AccountPolicy,
    ) -> AccountService<InMemoryUserRepository> {
        AccountService::new(repository, PasswordHasher::new(TEST_COST), policy)
    }

    fn service() -> AccountService<InMemoryUserRepository> {
        service_with(InMemoryUserRepository::new(), AccountPolicy::default())
    }

    fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();

        let user = service
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();
        assert_eq!(user.username, "flory");
        assert_ne!(user.password_hash, "longenough1");

        let authenticated = service.authenticate("flory", "longenough1").await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();

        let wrong_password = service.authenticate("flory", "wrongpass1").await;
        let unknown_user = service.authenticate("nobody", "longenough1").await;

        assert!(matches!(
            wrong_password,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(unknown_user, Err(ServiceError::InvalidCredentials)));
        assert_eq!(
            wrong_password.unwrap_err().to_string(),
            unknown_user.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = service();
        service
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();

        let second = service
            .register(register_request("flory", "other@example.com", "longenough1"))
            .await;

        assert!(matches!(
            second,
            Err(ServiceError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_have_one_winner() {
        let repository = InMemoryUserRepository::new();

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service_with(repository.clone(), AccountPolicy::default());
            handles.push(tokio::spawn(async move {
                service
                    .register(register_request(
                        "flory",
                        &format!("flory{}@example.com", i),
                        "longenough1",
                    ))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert!(
            repository
                .find_by_username("flory")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_email_uniqueness_is_a_policy() {
        let repository = InMemoryUserRepository::new();
        let enforcing = service_with(repository.clone(), AccountPolicy::default());

        enforcing
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();
        let duplicate = enforcing
            .register(register_request("other", "flory@example.com", "longenough1"))
            .await;
        assert!(matches!(duplicate, Err(ServiceError::AlreadyExists { .. })));

        let relaxed = service_with(
            repository,
            AccountPolicy {
                enforce_email_uniqueness: false,
                ..AccountPolicy::default()
            },
        );
        relaxed
            .register(register_request("other", "flory@example.com", "longenough1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_by_email_policy() {
        let service = service_with(
            InMemoryUserRepository::new(),
            AccountPolicy {
                login_identifier: LoginIdentifier::Email,
                ..AccountPolicy::default()
            },
        );

        service
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();

        assert!(
            service
                .authenticate("flory@example.com", "longenough1")
                .await
                .is_ok()
        );
        // The username is not a valid identifier under this policy.
        assert!(matches!(
            service.authenticate("flory", "longenough1").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let service = service();
        service
            .register(register_request("flory", "flory@example.com", "longenough1"))
            .await
            .unwrap();

        let wrong_old = service
            .change_password(ChangePasswordRequest {
                username: "flory".to_string(),
                old_password: "notit1234".to_string(),
                new_password: "evenlonger2".to_string(),
                confirm_new_password: "evenlonger2".to_string(),
            })
            .await;
        assert!(matches!(wrong_old, Err(ServiceError::Validation { .. })));

        service
            .change_password(ChangePasswordRequest {
                username: "flory".to_string(),
                old_password: "longenough1".to_string(),
                new_password: "evenlonger2".to_string(),
                confirm_new_password: "evenlonger2".to_string(),
            })
            .await
            .unwrap();

        assert!(service.authenticate("flory", "evenlonger2").await.is_ok());
        assert!(matches!(
            service.authenticate("flory", "longenough1").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_change_password_unknown_user() {
        let result = service()
            .change_password(ChangePasswordRequest {
                username: "nobody".to_string(),
                old_password: "longenough1".to_string(),
                new_password: "evenlonger2".to_string(),
                confirm_new_password: "evenlonger2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_username_shape_boundaries() {
        let service = service();

        for (username, ok) in [("ab", false), ("abc", true), ("user name", false)] {
            let result = service
                .register(register_request(username, "flory@example.com", "longenough1"))
                .await;
            assert_eq!(result.is_ok(), ok, "username {:?}", username);
        }
    }

    #[tokio::test]
    async fn test_password_strength_policies() {
        let base = service();
        let strict = service_with(
            InMemoryUserRepository::new(),
            AccountPolicy {
                require_password_symbol: true,
                ..AccountPolicy::default()
            },
        );

        // 7 characters: always too short.
        assert!(base.validate_password_strength("short1").is_err());

        // Letters and a digit: fine for the base policy only.
        assert!(base.validate_password_strength("longenough1").is_ok());
        assert!(strict.validate_password_strength("longenough1").is_err());

        // With a symbol: fine under both.
        assert!(base.validate_password_strength("longenough1!").is_ok());
        assert!(strict.validate_password_strength("longenough1!").is_ok());

        // Digits only never passes.
        assert!(base.validate_password_strength("12345678").is_err());
    }

    #[tokio::test]
    async fn test_password_confirmation_must_match() {
        let result = service()
            .register(RegisterRequest {
                username: "flory".to_string(),
                email: "flory@example.com".to_string(),
                password: "longenough1".to_string(),
                confirm_password: "different1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let result = service()
            .register(register_request("", "", ""))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[test]
    fn test_email_shape() {
        type Service = AccountService<InMemoryUserRepository>;

        assert!(Service::validate_email_shape("flory@example.com").is_ok());
        assert!(Service::validate_email_shape("florysflowers").is_err());
        assert!(Service::validate_email_shape("@example.com").is_err());
        assert!(Service::validate_email_shape("flory@nodot").is_err());
        assert!(Service::validate_email_shape("flo ry@example.com").is_err());
    }
}
