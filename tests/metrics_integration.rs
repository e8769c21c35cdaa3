mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use cloudops_insight::config::AppConfig;
use cloudops_insight::routes::with_pipeline;
use cloudops_insight::state::AppState;
use cloudops_insight::utils::http_helpers::ErrorBody;
use cloudops_insight::utils::random::{FixedRandom, SeededRandom};
use common::{
    body_json, build_app, build_state, complete, http_labels, sample_value, scrape, send,
};
use futures::future::join_all;

const COUNTER: &str = "http_requests_total";
const HISTOGRAM_COUNT: &str = "http_request_duration_seconds_count";
const HISTOGRAM_SUM: &str = "http_request_duration_seconds_sum";

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_all_counted() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.5)));
    let labels = http_labels("GET", "/healthz", 200);

    complete(&app, "/healthz", Method::GET).await;
    let before = sample_value(&scrape(&app).await, COUNTER, &labels);

    let n = 200;
    let handles = (0..n).map(|_| {
        let app = app.clone();
        tokio::spawn(async move { complete(&app, "/healthz", Method::GET).await })
    });
    for status in join_all(handles).await {
        assert_eq!(status.expect("task should not panic"), StatusCode::OK);
    }

    let after = sample_value(&scrape(&app).await, COUNTER, &labels);
    assert_eq!(after - before, n as f64);
    assert_eq!(
        sample_value(&scrape(&app).await, HISTOGRAM_COUNT, &labels),
        after
    );
}

#[tokio::test]
async fn each_request_adds_one_histogram_sample() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.5)));
    let labels = http_labels("GET", "/ready", 200);

    for expected in 1..=3 {
        complete(&app, "/ready", Method::GET).await;
        let text = scrape(&app).await;
        assert_eq!(
            sample_value(&text, HISTOGRAM_COUNT, &labels),
            expected as f64
        );
        let sum = sample_value(&text, HISTOGRAM_SUM, &labels);
        assert!(sum.is_finite() && sum >= 0.0, "duration sum {sum}");
    }
}

#[tokio::test]
async fn labels_track_status_and_unmatched_paths() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.99)));

    complete(&app, "/api/random", Method::GET).await;
    complete(&app, "/unknown/path", Method::GET).await;
    complete(&app, "/healthz", Method::POST).await;

    let text = scrape(&app).await;
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("GET", "/api/random", 500)),
        1.0
    );
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("GET", "/unknown/path", 404)),
        1.0
    );
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("POST", "/healthz", 404)),
        1.0
    );
}

#[tokio::test]
async fn path_variants_share_the_route_label() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.5)));

    for path in ["/healthz", "/HEALTHZ", "/healthz/"] {
        assert_eq!(complete(&app, path, Method::GET).await, StatusCode::OK);
    }

    let text = scrape(&app).await;
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("GET", "/healthz", 200)),
        3.0
    );
    assert!(!text.contains("route=\"/HEALTHZ\""));
}

#[tokio::test]
async fn scrape_does_not_reset_counters() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.5)));
    let labels = http_labels("GET", "/api/hello", 200);

    complete(&app, "/api/hello", Method::GET).await;
    complete(&app, "/api/hello", Method::GET).await;
    let first = sample_value(&scrape(&app).await, COUNTER, &labels);
    let second = sample_value(&scrape(&app).await, COUNTER, &labels);
    assert_eq!(first, 2.0);
    assert_eq!(second, 2.0);

    // Scrapes are counted once they complete.
    let text = scrape(&app).await;
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("GET", "/metrics", 200)),
        2.0
    );
}

#[tokio::test]
async fn responses_dropped_before_the_body_is_sent_are_not_counted() {
    let (app, _state) = build_app(AppConfig::default(), Arc::new(FixedRandom(0.5)));
    let labels = http_labels("GET", "/api/hello", 200);

    let response = send(&app, "/api/hello", Method::GET).await;
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    let text = scrape(&app).await;
    assert_eq!(sample_value(&text, COUNTER, &labels), 0.0);
    assert_eq!(sample_value(&text, HISTOGRAM_COUNT, &labels), 0.0);

    complete(&app, "/api/hello", Method::GET).await;
    let text = scrape(&app).await;
    assert_eq!(sample_value(&text, COUNTER, &labels), 1.0);
    assert_eq!(sample_value(&text, HISTOGRAM_COUNT, &labels), 1.0);
}

#[tokio::test]
async fn exposition_is_well_formed_after_mixed_traffic() {
    let (app, _state) = build_app(
        AppConfig::default(),
        Arc::new(SeededRandom::with_seed(3)),
    );

    for path in ["/", "/healthz", "/ready", "/api/hello", "/nope", "/metrics"] {
        complete(&app, path, Method::GET).await;
    }
    for _ in 0..50 {
        complete(&app, "/api/random", Method::GET).await;
    }

    let text = scrape(&app).await;
    let mut types: HashMap<&str, &str> = HashMap::new();
    for line in text.lines().filter(|l| l.starts_with("# TYPE ")) {
        let mut parts = line.trim_start_matches("# TYPE ").split_whitespace();
        let name = parts.next().expect("TYPE line should name a metric");
        let kind = parts.next().expect("TYPE line should carry a kind");
        types.insert(name, kind);
    }

    assert_eq!(types.get(COUNTER), Some(&"counter"));
    assert_eq!(
        types.get("http_request_duration_seconds"),
        Some(&"histogram")
    );
    assert_eq!(types.get("process_uptime_seconds"), Some(&"gauge"));

    for line in text.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
        let name = line
            .split(['{', ' '])
            .next()
            .expect("sample line should start with a name");
        let declared = types.contains_key(name)
            || ["_bucket", "_sum", "_count"].iter().any(|suffix| {
                name.strip_suffix(suffix)
                    .is_some_and(|base| types.get(base) == Some(&"histogram"))
            });
        assert!(declared, "sample without TYPE declaration: {line}");

        let value = line.rsplit(' ').next().expect("sample line should carry a value");
        assert!(
            value.parse::<f64>().is_ok(),
            "sample value is not numeric: {line}"
        );
    }
}

#[tokio::test]
async fn handler_panics_are_masked_and_counted() {
    async fn boom() -> &'static str {
        panic!("database exploded")
    }

    let state: AppState = build_state(AppConfig::default(), Arc::new(FixedRandom(0.5)));
    let app = with_pipeline(Router::new().route("/boom", get(boom)), state.clone());

    let response = send(&app, "/boom", Method::GET).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.error, "Internal server error");

    assert_eq!(
        complete(&app, "/boom", Method::GET).await,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let text = cloudops_insight::metrics::MetricsRecorder::render(&state.metrics)
        .expect("metrics should render");
    assert_eq!(
        sample_value(&text, COUNTER, &http_labels("GET", "/boom", 500)),
        2.0
    );
}
