//! Error-to-HTTP response conversion for the proxy routes.
//!
//! Keeps the JSON contract browser clients rely on: `{error}` bodies, with a
//! 400 for configuration or input problems and a 500 for upstream failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use crate::catalog::FetchError;

/// A failed proxy request.
pub struct ProxyError {
    inner: FetchError,
    /// Message shown for upstream failures, e.g. "Failed to search movies".
    failure_message: &'static str,
}

impl ProxyError {
    pub fn new(inner: FetchError, failure_message: &'static str) -> Self {
        Self {
            inner,
            failure_message,
        }
    }

    pub fn missing_query() -> Self {
        Self::new(FetchError::InvalidQuery, "A search query is required")
    }

    pub fn status(&self) -> StatusCode {
        match self.inner {
            FetchError::MissingCredential | FetchError::InvalidQuery => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self.inner {
            FetchError::MissingCredential => {
                tracing::error!("TMDB API key not set");
                json!({
                    "error": self.inner.user_message(),
                    "results": [],
                    "last_updated": Utc::now(),
                })
            }
            FetchError::InvalidQuery => json!({ "error": self.inner.user_message() }),
            other => {
                tracing::error!(
                    status = %status,
                    error = %other,
                    "Upstream failure in proxy route"
                );
                json!({ "error": self.failure_message })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
