use axum::http::StatusCode;

/// Liveness probe.
pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
