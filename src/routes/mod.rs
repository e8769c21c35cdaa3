//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! health checks, metrics exposition, the sample API and the index.

mod api_routes;
mod health_routes;
mod index_routes;
mod metrics;

pub use api_routes::{HelloResponse, RANDOM_ERROR_THRESHOLD, RandomResponse};
pub use health_routes::{HealthResponse, ReadinessResponse};
pub use index_routes::{Endpoints, IndexResponse};

use crate::middleware::http_metrics_middleware;
use crate::state::AppState;
use crate::utils::http_helpers::{handle_panic, normalize_path, not_found};
use axum::{Router, body::Body, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and wraps it in the
/// request pipeline.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(index_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics::routes())
        .merge(api_routes::routes());

    with_pipeline(routes, state)
}

/// Installs the not-found fallback and the middleware chain around `routes`.
///
/// Panics are converted into masked 500s inside the instrumentation, so they
/// are counted like any other completed request. Paths are matched
/// case-insensitively and with an optional trailing slash; the path is
/// rewritten by an outer router before the inner one matches it.
pub fn with_pipeline(routes: Router<AppState>, state: AppState) -> Router {
    let app = routes
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http_metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new().fallback_service(
        ServiceBuilder::new()
            .map_request(normalize_path::<Body>)
            .service(app),
    )
}
