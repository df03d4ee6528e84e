//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, JWT settings, and the account policy
//! switches that differ between deployments.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Which field identifies an account at login time.
///
/// Deployments disagree on this, so it is a configuration option rather
/// than a hard rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username,
    Email,
}

impl FromStr for LoginIdentifier {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "username" => Ok(LoginIdentifier::Username),
            "email" => Ok(LoginIdentifier::Email),
            _ => Err(format!("Invalid login identifier: {}", input)),
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self {
            LoginIdentifier::Username => "username",
            LoginIdentifier::Email => "email",
        };
        write!(f, "{}", field)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
    pub bcrypt_cost: u32,
    pub login_identifier: LoginIdentifier,
    pub enforce_email_uniqueness: bool,
    pub require_password_symbol: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;

        let login_identifier = env::var("LOGIN_IDENTIFIER")
            .unwrap_or_else(|_| "username".to_string())
            .parse::<LoginIdentifier>()
            .map_err(anyhow::Error::msg)
            .context("LOGIN_IDENTIFIER must be 'username' or 'email'")?;

        let enforce_email_uniqueness = env::var("ENFORCE_EMAIL_UNIQUENESS")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .context("ENFORCE_EMAIL_UNIQUENESS must be true or false")?;

        let require_password_symbol = env::var("REQUIRE_PASSWORD_SYMBOL")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("REQUIRE_PASSWORD_SYMBOL must be true or false")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
            bcrypt_cost,
            login_identifier,
            enforce_email_uniqueness,
            require_password_symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_identifier_from_str() {
        assert_eq!(
            "username".parse::<LoginIdentifier>().unwrap(),
            LoginIdentifier::Username
        );
        assert_eq!(
            "Email".parse::<LoginIdentifier>().unwrap(),
            LoginIdentifier::Email
        );
        assert!("phone".parse::<LoginIdentifier>().is_err());
    }
}
