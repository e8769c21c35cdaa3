#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use cloudops_insight::config::AppConfig;
use cloudops_insight::metrics::Metrics;
use cloudops_insight::routes::create_router;
use cloudops_insight::state::AppState;
use cloudops_insight::utils::random::RandomSource;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

pub fn build_state(config: AppConfig, random: Arc<dyn RandomSource>) -> AppState {
    AppState {
        config: Arc::new(config),
        metrics: Metrics::new().expect("metrics should register"),
        random,
    }
}

pub fn build_app(config: AppConfig, random: Arc<dyn RandomSource>) -> (Router, AppState) {
    let state = build_state(config, random);
    (create_router(state.clone()), state)
}

pub fn request(path: &str, method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn send(app: &Router, path: &str, method: Method) -> Response<Body> {
    app.clone()
        .oneshot(request(path, method))
        .await
        .expect("request should complete")
}

/// Sends a request and reads the whole response body, as a client would.
pub async fn complete(app: &Router, path: &str, method: Method) -> StatusCode {
    let response = send(app, path, method).await;
    let status = response.status();
    body_bytes(response).await;
    status
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

/// Scrapes `/metrics` through the router.
pub async fn scrape(app: &Router) -> String {
    body_text(send(app, "/metrics", Method::GET).await).await
}

/// Value of the sample `name{labels}` in an exposition text, 0 when absent.
pub fn sample_value(exposition: &str, name: &str, labels: &str) -> f64 {
    let prefix = format!("{}{{{}}} ", name, labels);
    exposition
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(|v| v.trim().parse().expect("sample value should be numeric"))
        .unwrap_or(0.0)
}

pub fn http_labels(method: &str, route: &str, status: u16) -> String {
    format!(
        "method=\"{}\",route=\"{}\",status_code=\"{}\"",
        method, route, status
    )
}
