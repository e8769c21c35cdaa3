//! Metrics exposition endpoint.

use crate::metrics::{CONTENT_TYPE, MetricsRecorder};
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, not_found};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

/// Creates the metrics route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler).fallback(not_found))
}

/// Handler for the /metrics endpoint.
///
/// Returns all collected metrics in Prometheus text format.
async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, HTTPError> {
    let metrics_text = state.metrics.render().map_err(HTTPError::internal)?;

    Ok((
        StatusCode::OK,
        [("Content-Type", CONTENT_TYPE)],
        metrics_text,
    ))
}
