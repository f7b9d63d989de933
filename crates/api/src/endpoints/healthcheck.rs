//! Healthcheck endpoint.

use axum::{Router, routing::get};

use crate::middleware::AppState;
use crate::response::ApiResponse;

async fn healthcheck() -> ApiResponse<&'static str> {
    ApiResponse::ok("OK", "Service is healthy")
}

/// Create the healthcheck router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(healthcheck))
}
