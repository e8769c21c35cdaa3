//! HTTP request metrics recorded against the shared registry.

use std::sync::Arc;

use super::registry::MetricsRegistry;
use crate::error::Result;

pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

const HTTP_LABELS: [&str; 3] = ["method", "route", "status_code"];

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one completed HTTP exchange: a count increment and a duration observation.
    fn record_http_request(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_secs: f64,
    ) -> Result<()>;

    /// Renders all metrics in Prometheus text format.
    fn render(&self) -> Result<String>;
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<MetricsRegistry>,
}

impl Metrics {
    /// Creates the request instruments on a fresh registry.
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(MetricsRegistry::new()?))
    }

    /// Creates the request instruments on an existing registry.
    pub fn with_registry(registry: Arc<MetricsRegistry>) -> Result<Self> {
        registry.register_histogram(
            HTTP_REQUEST_DURATION_SECONDS,
            "Duration of HTTP requests in seconds",
            &HTTP_LABELS,
            prometheus::DEFAULT_BUCKETS.to_vec(),
        )?;
        registry.register_counter(
            HTTP_REQUESTS_TOTAL,
            "Total number of HTTP requests",
            &HTTP_LABELS,
        )?;

        Ok(Metrics { registry })
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }
}

impl MetricsRecorder for Metrics {
    fn record_http_request(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_secs: f64,
    ) -> Result<()> {
        let status = status_code.to_string();
        let labels = [method, route, status.as_str()];
        self.registry.increment(HTTP_REQUESTS_TOTAL, &labels)?;
        self.registry
            .observe(HTTP_REQUEST_DURATION_SECONDS, &labels, duration_secs)
    }

    fn render(&self) -> Result<String> {
        self.registry.export()
    }
}
