use serde::Serialize;
use axum::response::{IntoResponse, Response};

/// Wrapper type for JSON error responses.
///
/// Serializes as `{"error": "<message>"}`.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        ErrorResponse {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}
