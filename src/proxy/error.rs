//! Client-visible failure taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::balancer::NoHealthyBackends;

/// Everything that can go wrong while serving one request.
///
/// Every variant renders as 503 with a one-field JSON body; the variant
/// messages are the client-facing contract and the sources only feed logs.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Selection found the healthy set empty.
    #[error("No healthy backends available")]
    NoHealthyBackends,

    /// The chosen backend could not be reached at all.
    #[error("Backend connection failed")]
    Connect(#[source] hyper_util::client::legacy::Error),

    /// The backend was reached but the exchange did not complete, whether a
    /// protocol error, a truncated body, or the request timeout.
    #[error("Backend request failed")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<NoHealthyBackends> for ProxyError {
    fn from(_: NoHealthyBackends) -> Self {
        Self::NoHealthyBackends
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
