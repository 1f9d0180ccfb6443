//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use imgstore_shared::AppError;
use serde::Serialize;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine readable code.
    pub error: &'static str,
    /// Human readable message.
    pub message: String,
}

/// Renders `err` with its status and code and a caller facing `message`.
///
/// Internal details stay in the logs; only `message` reaches the client.
pub fn error_response(err: &AppError, message: impl Into<String>) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            error: err.error_code(),
            message: message.into(),
        }),
    )
        .into_response()
}
