//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user registration,
//! login, and password changes, parse request data, and interact with the
//! `auth::service` for core business logic.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<UserInfo>>), (StatusCode, String)> {
    let auth_service = match AuthService::new(&pool) {
        Ok(service) => service,
        Err(error) => return Err(service_error_to_http(error)),
    };

    match auth_service.register(payload).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                user,
                "Registration successful, please log in",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    let auth_service = match AuthService::new(&pool) {
        Ok(service) => service,
        Err(error) => return Err(service_error_to_http(error)),
    };

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password change request
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let auth_service = match AuthService::new(&pool) {
        Ok(service) => service,
        Err(error) => return Err(service_error_to_http(error)),
    };

    let username = payload.username.clone();
    match auth_service.change_password(payload).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({ "username": username }),
            "Password changed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<UserInfo>>, (StatusCode, String)> {
    let auth_service = match AuthService::new(&pool) {
        Ok(service) => service,
        Err(error) => return Err(service_error_to_http(error)),
    };

    match auth_service.current_user(&claims).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
