//! Metrics collection and exposition for Prometheus.
//!
//! The registry owns named instruments; the recorder wires the HTTP request
//! instruments onto it.

mod recorder;
mod registry;

pub use recorder::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS, Metrics, MetricsRecorder};
pub use registry::{CONTENT_TYPE, MetricsRegistry};
