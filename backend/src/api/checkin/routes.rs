//! Defines the HTTP routes for the check-in log.

use super::handlers::{get_check_in_count, record_check_in};
use axum::{
    Router,
    routing::{get, post},
};

pub async fn checkin_router() -> Router {
    Router::new()
        .route("/", post(record_check_in))
        .route("/{username}", get(get_check_in_count))
}
