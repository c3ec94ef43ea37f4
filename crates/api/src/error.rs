//! Conversion from application errors to HTTP responses.

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use dte_reports_shared::AppError;

/// Renders an application error as a JSON response with its mapped status.
pub fn error_response(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string()
        })),
    )
        .into_response()
}
