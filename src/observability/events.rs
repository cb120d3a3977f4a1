//! Structured proxy events.

use std::error::Error;
use std::time::Duration;

use axum::http::StatusCode;

use crate::registry::Backend;

/// Receiver for the proxy's structured events.
///
/// The prober and the pipeline are handed a sink at construction and report
/// facts through it; how those facts are logged, counted, or captured is the
/// sink's business. Implementations are called on hot paths and must be
/// cheap and non-blocking.
pub trait EventSink: Send + Sync {
    /// One health probe finished.
    fn probe_result(&self, backend: &Backend, healthy: bool, latency: Duration);

    /// A probe outcome flipped the backend's health state.
    fn health_transition(&self, backend: &Backend, now_healthy: bool);

    /// The policy picked a backend for an inbound request.
    fn backend_selected(&self, backend: &Backend);

    /// A forwarded request produced a response.
    fn forward_result(&self, backend: &Backend, status: StatusCode, latency: Duration);

    /// A forwarded request failed before producing a response.
    fn forward_failure(&self, backend: &Backend, error: &(dyn Error + 'static));
}

/// Default sink: forwards every event to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn probe_result(&self, backend: &Backend, healthy: bool, latency: Duration) {
        if healthy {
            tracing::debug!(
                port = backend.port(),
                latency_ms = latency.as_millis() as u64,
                "Health probe succeeded"
            );
        } else {
            tracing::warn!(
                port = backend.port(),
                latency_ms = latency.as_millis() as u64,
                "Health probe failed"
            );
        }
    }

    fn health_transition(&self, backend: &Backend, now_healthy: bool) {
        if now_healthy {
            tracing::info!(port = backend.port(), "Backend recovered, marking healthy");
        } else {
            tracing::warn!(port = backend.port(), "Backend down, marking unhealthy");
        }
    }

    fn backend_selected(&self, backend: &Backend) {
        tracing::debug!(port = backend.port(), "Selected backend");
    }

    fn forward_result(&self, backend: &Backend, status: StatusCode, latency: Duration) {
        tracing::info!(
            port = backend.port(),
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Forwarded request"
        );
    }

    fn forward_failure(&self, backend: &Backend, error: &(dyn Error + 'static)) {
        tracing::error!(
            port = backend.port(),
            error = %error,
            cause = ?error.source(),
            "Forward failed"
        );
    }
}
