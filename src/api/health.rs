//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// Health response body
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe - verifies the repository answers queries
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, status) = match state.user_service.list().await {
        Ok(_) => (StatusCode::OK, HealthStatus::Healthy),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Degraded),
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}
