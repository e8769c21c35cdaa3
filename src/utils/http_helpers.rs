use std::any::Any;
use std::fmt::Display;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::uri::PathAndQuery;
use http::{Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};

const INTERNAL_SERVER_ERROR: &str = "Internal server error";
const NOT_FOUND: &str = "Not found";

/// JSON body of every error response.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    /// Logs `err` server-side and masks it behind a generic 500.
    pub fn internal(err: impl Display) -> Self {
        tracing::error!(error = %err, "Unhandled error while serving request");
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
    }

    pub fn not_found() -> Self {
        HTTPError::new(StatusCode::NOT_FOUND, NOT_FOUND)
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Catch-all for unmatched paths and unsupported methods. Not logged.
pub async fn not_found() -> HTTPError {
    HTTPError::not_found()
}

/// Lower-cases the request path and drops a single trailing slash.
///
/// Routes then match case-insensitively and with or without a trailing
/// slash. The query string is kept as is.
pub fn normalize_path<B>(mut request: Request<B>) -> Request<B> {
    let path = request.uri().path();
    let mut normalized = path.to_ascii_lowercase();
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    if normalized == path {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{normalized}?{query}"),
        None => normalized,
    };
    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = match PathAndQuery::try_from(path_and_query) {
        Ok(pq) => Some(pq),
        Err(_) => return request,
    };
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}

/// Terminal handler for panics escaping a route handler.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    HTTPError::internal(format_args!("handler panicked: {detail}")).into_response()
}
