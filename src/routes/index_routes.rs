//! Service directory at the root path.

use crate::config::SERVICE_NAME;
use crate::state::AppState;
use crate::utils::http_helpers::not_found;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index).fallback(not_found))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct IndexResponse {
    pub service: String,
    pub endpoints: Endpoints,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub health: String,
    pub ready: String,
    pub metrics: String,
    pub api: Vec<String>,
}

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME.to_string(),
        endpoints: Endpoints {
            health: "/healthz".to_string(),
            ready: "/ready".to_string(),
            metrics: "/metrics".to_string(),
            api: vec!["/api/hello".to_string(), "/api/random".to_string()],
        },
    })
}
