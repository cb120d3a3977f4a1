//! HTTP serving surface.
//!
//! # Responsibilities
//! - Assemble registry, policy, monitor, and pipeline from configuration
//! - Create the Axum router and wire up middleware (request ID, tracing)
//! - Run with graceful shutdown, stopping the health monitor afterwards
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → axum (request ID stamped, trace span opened)
//!     → proxy_handler
//!     → ProxyPipeline::handle
//!     → response to client
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::balancer;
use crate::config::ProxyConfig;
use crate::health::HealthMonitor;
use crate::observability::{EventSink, TracingEvents};
use crate::proxy::ProxyPipeline;
use crate::registry::BackendRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<ProxyPipeline>,
}

/// The assembled load balancer: registry, health monitor, pipeline, and
/// Axum router.
pub struct HttpServer {
    router: Router,
    monitor: HealthMonitor,
    registry: Arc<BackendRegistry>,
    health_enabled: bool,
}

impl HttpServer {
    /// Assemble the server from configuration with the default tracing
    /// event sink.
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_events(config, Arc::new(TracingEvents))
    }

    /// Assemble the server with a caller-supplied event sink.
    pub fn with_events(config: ProxyConfig, events: Arc<dyn EventSink>) -> Self {
        let registry = Arc::new(BackendRegistry::from_config(&config.backends));
        let policy = balancer::create_policy(config.policy);

        tracing::info!(
            backends = registry.len(),
            policy = policy.name(),
            "Backend registry initialized"
        );

        let pipeline = Arc::new(ProxyPipeline::new(
            registry.clone(),
            policy,
            &config.timeouts,
            events.clone(),
        ));
        let monitor = HealthMonitor::new(registry.clone(), config.health_check.clone(), events);
        let router = build_router(AppState { pipeline });

        Self {
            router,
            monitor,
            registry,
            health_enabled: config.health_check.enabled,
        }
    }

    /// Handle on the shared backend registry.
    pub fn registry(&self) -> Arc<BackendRegistry> {
        self.registry.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires, then stop the health monitor.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.health_enabled {
            self.monitor.start();
        } else {
            tracing::info!("Active health checks disabled");
        }

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        // In-flight requests have drained; take the prober down last so a
        // final probe cannot outlive the server.
        self.monitor.stop().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/{*path}", any(proxy_handler))
        .route("/", any(proxy_handler))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// Hand every request, any method and path, to the pipeline.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    state.pipeline.handle(request).await
}

/// Stamps each request with a UUID v4 `x-request-id`.
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}
