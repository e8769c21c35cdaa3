//! Health and readiness endpoints.

use crate::state::AppState;
use crate::utils::http_helpers::not_found;
use axum::{Json, Router, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_check).fallback(not_found))
        .route("/ready", get(readiness_check).fallback(not_found))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReadinessResponse {
    pub status: String,
}

/// Liveness: the process is up and answering.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Readiness: the process can take traffic. Always true for this service.
async fn readiness_check() -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: "ready".to_string(),
    })
}
