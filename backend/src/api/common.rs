//! Error handling utilities for API responses.
//!
//! Provides the standard response envelope and the conversion between
//! service-layer errors and HTTP responses.
//!
//! # Response Format
//! All responses share a consistent JSON envelope containing:
//! - `success`: whether the request succeeded
//! - `data`: payload (present on success)
//! - `message`: human-readable message
//! - `error`: machine-readable error category (present on failure)
//!
//! # Error Handling Flow
//! 1. Service layer returns a domain-specific `ServiceError`
//! 2. `service_error_to_http` converts it to the appropriate HTTP response
//! 3. Store and internal failures are logged in full and reported with a
//!    generic body, so internals never leak to the caller

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>, error_type: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::CONFLICT,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
        ),
        ServiceError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            ServiceError::InvalidCredentials.to_string(),
        ),
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    let error_response = ApiResponse::<()>::error(message, error_type);
    (status, serde_json::to_string(&error_response).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                ServiceError::validation("Username is required"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::not_found("User", "nobody"),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::already_exists("User", "flory"),
                StatusCode::CONFLICT,
            ),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ServiceError::internal_error("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, _) = service_error_to_http(error);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_internal_failures_do_not_leak_details() {
        let error = ServiceError::Database {
            source: anyhow::anyhow!("connection refused to db host 10.0.0.3"),
        };

        let (status, body) = service_error_to_http(error);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("10.0.0.3"));
    }

    #[test]
    fn test_invalid_credentials_body_is_generic() {
        let (_, body) = service_error_to_http(ServiceError::InvalidCredentials);

        assert!(body.contains("Invalid credentials"));
        assert!(!body.contains("username"));
        assert!(!body.contains("password"));
    }
}
