//! Response envelope shared by all endpoints: `{ code, message, data }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Successful response body. `code` mirrors the HTTP status.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(
        status: StatusCode,
        message: impl Into<String>,
        data: T,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                code: status.as_u16(),
                message: message.into(),
                data,
            }),
        )
    }
}

/// Error response body. Same envelope as [`ApiResponse`] plus a stable machine-readable `kind`.
pub fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    let body = serde_json::json!({
        "code": status.as_u16(),
        "kind": kind,
        "message": message,
        "data": null,
    });
    (status, Json(body)).into_response()
}
