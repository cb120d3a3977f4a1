//! Per-request orchestration: select, forward, annotate.
//!
//! # Responsibilities
//! - Turn one inbound request into one upstream exchange
//! - Classify upstream failures into the client-visible taxonomy
//! - Buffer the upstream response and run the body annotator
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → registry.healthy() → policy.select()
//!     → rewrite URI to the chosen backend, drop the inbound Host
//!     → bounded exchange (connect timeout + overall request timeout)
//!     → buffer body → rewrite::annotate → fix content-length
//!     → response (or ProxyError rendered as 503 JSON)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{header, response, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::balancer::RoutingPolicy;
use crate::config::TimeoutConfig;
use crate::observability::EventSink;
use crate::proxy::error::ProxyError;
use crate::proxy::rewrite;
use crate::registry::{Backend, BackendRegistry};

/// Handles one inbound request end to end.
///
/// Holds no per-request state; the registry and the policy counter are the
/// only shared data, so any number of handlers can run through it
/// concurrently.
pub struct ProxyPipeline {
    registry: Arc<BackendRegistry>,
    policy: Arc<dyn RoutingPolicy>,
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
    events: Arc<dyn EventSink>,
}

impl ProxyPipeline {
    pub fn new(
        registry: Arc<BackendRegistry>,
        policy: Arc<dyn RoutingPolicy>,
        timeouts: &TimeoutConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            registry,
            policy,
            client,
            request_timeout: Duration::from_secs(timeouts.request_secs),
            events,
        }
    }

    /// Serve one request. Failures become 503 responses; this never errors
    /// and never panics on anything the client or a backend sends.
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        match self.forward(request).await {
            Ok(response) => response,
            Err(error) => error.into_response(),
        }
    }

    async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let backend = self.policy.select(&self.registry.healthy())?;
        self.events.backend_selected(&backend);

        match self.attempt(request, &backend).await {
            Ok(response) => Ok(response),
            Err(error) => {
                self.events.forward_failure(&backend, &error);
                Err(error)
            }
        }
    }

    /// One forwarding attempt against an already-chosen backend.
    async fn attempt(
        &self,
        request: Request<Body>,
        backend: &Backend,
    ) -> Result<Response<Body>, ProxyError> {
        let outbound = build_outbound(request, backend)
            .map_err(|error| ProxyError::Upstream(Box::new(error)))?;

        let started = Instant::now();
        let (mut parts, bytes) = self.exchange(outbound).await?;
        let latency = started.elapsed();

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/plain");
        let rewritten = rewrite::annotate(&bytes, content_type, backend.port());

        if rewritten.len() != bytes.len() {
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(rewritten.len()));
        }
        // The body is fully buffered at this point, so any upstream framing
        // header no longer describes what we send.
        parts.headers.remove(header::TRANSFER_ENCODING);

        self.events.forward_result(backend, parts.status, latency);
        Ok(Response::from_parts(parts, Body::from(rewritten)))
    }

    /// One bounded request/response exchange: the timeout covers sending
    /// the request and collecting the full response body.
    async fn exchange(
        &self,
        request: Request<Body>,
    ) -> Result<(response::Parts, Bytes), ProxyError> {
        let exchange = async {
            let response = self.client.request(request).await.map_err(|error| {
                if error.is_connect() {
                    ProxyError::Connect(error)
                } else {
                    ProxyError::Upstream(Box::new(error))
                }
            })?;

            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(|error| ProxyError::Upstream(Box::new(error)))?;

            Ok((parts, bytes))
        };

        match time::timeout(self.request_timeout, exchange).await {
            Ok(result) => result,
            Err(elapsed) => Err(ProxyError::Upstream(Box::new(elapsed))),
        }
    }
}

/// Re-address an inbound request to the chosen backend.
///
/// Keeps the method, path, query, headers, and body; replaces scheme and
/// authority. The inbound `Host` header is dropped so the client stamps the
/// backend's own authority instead.
fn build_outbound(
    request: Request<Body>,
    backend: &Backend,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let uri = format!("http://{}{}", backend.authority(), path_and_query);

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)?;

    let mut headers = parts.headers;
    headers.remove(header::HOST);
    *outbound.headers_mut() = headers;

    Ok(outbound)
}
