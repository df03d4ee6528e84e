//! Request and response payloads for the check-in endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Check-in request payload
#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// Response after recording a check-in
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub check_in_id: String,
}

/// Per-username check-in count
#[derive(Debug, Serialize)]
pub struct CheckInCountResponse {
    pub username: String,
    pub check_in_count: i64,
}
