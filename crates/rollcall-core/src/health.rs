use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness check. Readiness is service-specific.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
