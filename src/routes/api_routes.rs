//! Sample API endpoints.

use crate::config::SERVICE_NAME;
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, not_found};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Draws above this value fail `/api/random`.
pub const RANDOM_ERROR_THRESHOLD: f64 = 0.9;

/// Registers the sample API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/hello", get(hello).fallback(not_found))
        .route("/api/random", get(random).fallback(not_found))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HelloResponse {
    pub message: String,
    pub version: String,
    pub environment: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RandomResponse {
    pub value: f64,
    pub timestamp: i64,
}

/// Greeting carrying the deployed version and environment.
async fn hello(State(state): State<AppState>) -> Json<HelloResponse> {
    Json(HelloResponse {
        message: format!("Hello from {}!", SERVICE_NAME),
        version: state.config.app_version.clone(),
        environment: state.config.node_env.clone(),
    })
}

/// Fault injection for exercising alerting: roughly one call in ten fails.
async fn random(State(state): State<AppState>) -> Response {
    let value = state.random.next_unit();

    if value > RANDOM_ERROR_THRESHOLD {
        return HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Random error occurred")
            .into_response();
    }

    Json(RandomResponse {
        value,
        timestamp: Utc::now().timestamp_millis(),
    })
    .into_response()
}
