//! HTTP metrics middleware.
//!
//! Wraps every exchange, including 404s and masked 500s, and records one
//! counter increment plus one duration observation once the last body frame
//! has been handed to the connection. A response whose body is dropped before
//! that point (client gone, write error) is not recorded. The response itself
//! is passed through untouched.

use axum::body::{Body, Bytes};
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http_body::{Frame, SizeHint};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use crate::metrics::{Metrics, MetricsRecorder};
use crate::state::AppState;

/// Labels and start time of an exchange still waiting for its body to finish.
struct PendingObservation {
    metrics: Metrics,
    method: String,
    route: String,
    status_code: u16,
    start: Instant,
}

impl PendingObservation {
    fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        if let Err(e) = self.metrics.record_http_request(
            &self.method,
            &self.route,
            self.status_code,
            duration,
        ) {
            tracing::warn!(
                error = %e,
                method = %self.method,
                route = %self.route,
                status_code = self.status_code,
                "Failed to record request metrics"
            );
        }
    }
}

/// Response body that records its exchange when the final frame is yielded.
struct InstrumentedBody {
    inner: Body,
    pending: Option<PendingObservation>,
}

impl InstrumentedBody {
    fn finish(&mut self) {
        if let Some(observation) = self.pending.take() {
            observation.record();
        }
    }
}

impl http_body::Body for InstrumentedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(None) => this.finish(),
            Poll::Ready(Some(Ok(_))) if this.inner.is_end_stream() => this.finish(),
            // The response never fully left the server.
            Poll::Ready(Some(Err(_))) => this.pending = None,
            _ => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Records method, route template (raw path when unmatched), status and duration.
pub async fn http_metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    let observation = PendingObservation {
        metrics: state.metrics.clone(),
        method,
        route,
        status_code: response.status().as_u16(),
        start,
    };

    // Nothing left to send, and the connection will never poll an empty body.
    if http_body::Body::is_end_stream(response.body()) {
        observation.record();
        return response;
    }

    response.map(|inner| {
        Body::new(InstrumentedBody {
            inner,
            pending: Some(observation),
        })
    })
}
