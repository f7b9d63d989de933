//! API response envelope.
//!
//! Every success travels in the same shape clients already parse:
//! `{"status", "message", "data", "success"}` where `success` is true iff
//! the status code is below 400. Errors produce the same shape with
//! `data: null` from `AppError::into_response`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Human-readable outcome.
    pub message: String,
    /// The payload.
    pub data: T,
    /// True iff `status < 400`.
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a response with an explicit status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
            success: status.as_u16() < 400,
        }
    }

    /// Create a 200 response.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// Create a 201 response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_tracks_status() {
        let ok = ApiResponse::ok("fetched", serde_json::json!({"id": 1}));
        assert_eq!(ok.status, 200);
        assert!(ok.success);

        let created = ApiResponse::created("made", ());
        assert_eq!(created.status, 201);
        assert!(created.success);
    }

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok("fetched", 7)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "status": 200,
                "message": "fetched",
                "data": 7,
                "success": true,
            })
        );
    }
}
