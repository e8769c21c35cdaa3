//! Application startup and server initialization.
//!
//! This module is the composition root: it builds the metrics registry,
//! the randomness source and the router, binds the listener and serves
//! until a termination signal arrives.

use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;
use crate::utils::random::SeededRandom;

/// Builds the shared state for a configuration.
pub fn build_state(config: Arc<AppConfig>) -> Result<AppState> {
    let metrics = Metrics::new()?;
    let random = Arc::new(SeededRandom::from_seed(config.random_seed));

    Ok(AppState {
        config,
        metrics,
        random,
    })
}

/// Initializes and runs the application server.
///
/// Returns as soon as SIGTERM is received. In-flight requests are not drained.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured port
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let state = build_state(config.clone())?;
    let app = routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Server running on port {}", config.port);
    info!("Health check: http://localhost:{}/healthz", config.port);
    info!("Metrics: http://localhost:{}/metrics", config.port);

    tokio::select! {
        served = axum::serve(listener, app).into_future() => served.map_err(Error::Serve),
        _ = termination_signal() => {
            info!("SIGTERM received, shutting down");
            Ok(())
        }
    }
}

#[cfg(unix)]
async fn termination_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn termination_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
