//! JWT token utilities for authentication and authorization.
//!
//! Provides secure token creation, validation, and claims management for
//! user authentication.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};

/// JWT Claims structure containing user authentication data
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the loaded configuration
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate a new access token for an authenticated user
    pub fn generate_token(&self, user: &User) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::validation(format!("Token validation failed: {}", e)))
    }

    /// Generate a refresh token (longer expiration)
    pub fn generate_refresh_token(&self, user: &User) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::days(30);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            ServiceError::internal_error(format!("Refresh token generation failed: {}", e))
        })
    }
}

impl Claims {
    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoginIdentifier;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            bcrypt_cost: 4,
            login_identifier: LoginIdentifier::Username,
            enforce_email_uniqueness: true,
            require_password_symbol: false,
        }
    }

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: "0190b5a1-0000-7000-8000-000000000000".to_string(),
            username: "flory".to_string(),
            email: "flory@example.com".to_string(),
            password_hash: "$2b$04$invalidinvalidinvalidinvalid".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let jwt_utils = JwtUtils::new(&test_config());
        let user = test_user();

        let token = jwt_utils.generate_token(&user).unwrap();
        let claims = jwt_utils.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let jwt_utils = JwtUtils::new(&test_config());
        let user = test_user();

        let token = jwt_utils.generate_refresh_token(&user).unwrap();
        let claims = jwt_utils.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt_utils = JwtUtils::new(&test_config());
        let token = jwt_utils.generate_token(&test_user()).unwrap();

        let mut other_config = test_config();
        other_config.jwt_secret = "another-secret".to_string();
        let other = JwtUtils::new(&other_config);

        assert!(other.validate_token(&token).is_err());
    }
}
