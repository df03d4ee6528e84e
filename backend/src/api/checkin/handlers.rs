//! Handler functions for check-in API endpoints.
//!
//! These functions process requests for recording check-ins and reading
//! per-user check-in counts.

use crate::api::checkin::models::*;
use crate::api::common::{ApiResponse, service_error_to_http};
use crate::services::checkin_service::CheckInService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle check-in recording request
#[axum::debug_handler]
pub async fn record_check_in(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CheckInResponse>>), (StatusCode, String)> {
    let service = CheckInService::new(&pool);

    match service.record_check_in(payload).await {
        Ok(check_in) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                CheckInResponse {
                    check_in_id: check_in.id,
                },
                "Check-in recorded successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle check-in count request
#[axum::debug_handler]
pub async fn get_check_in_count(
    Extension(pool): Extension<SqlitePool>,
    Path(username): Path<String>,
) -> Result<ResponseJson<ApiResponse<CheckInCountResponse>>, (StatusCode, String)> {
    let service = CheckInService::new(&pool);

    match service.check_in_count(&username).await {
        Ok(check_in_count) => Ok(ResponseJson(ApiResponse::success(
            CheckInCountResponse {
                username,
                check_in_count,
            },
            "Check-in count retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
