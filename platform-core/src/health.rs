//! Health check endpoint shared by every service gateway.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
}

/// Liveness endpoint: returns 200 OK while the process is running.
///
/// Does not verify dependencies.
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}
