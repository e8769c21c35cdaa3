//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, metrics, and the fault-injection randomness.

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::utils::random::RandomSource;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Built once by the composition root and cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<AppConfig>,
    /// Request instruments and the registry they live in.
    pub metrics: Metrics,
    /// Randomness behind `/api/random`.
    pub random: Arc<dyn RandomSource>,
}
