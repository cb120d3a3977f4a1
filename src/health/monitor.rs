//! Active health probing.
//!
//! # Responsibilities
//! - Run one background worker probing every backend on a fixed cadence
//! - Classify probe outcomes and write them into the registry
//! - Expose a start/stop lifecycle that joins the worker on stop

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::observability::EventSink;
use crate::registry::{Backend, BackendRegistry};

/// Background prober that keeps the registry's health flags current.
///
/// `start` spawns the probe worker; `stop` signals it and waits until it has
/// exited, so no probe writes race a completed shutdown. Both are no-ops
/// when called in the wrong state, and a stopped monitor can be started
/// again.
pub struct HealthMonitor {
    registry: Arc<BackendRegistry>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
    events: Arc<dyn EventSink>,
    worker: Mutex<Option<Worker>>,
}

struct Worker {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<BackendRegistry>,
        config: HealthCheckConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            registry,
            config,
            client,
            events,
            worker: Mutex::new(None),
        }
    }

    /// Spawn the probe worker. Calling `start` while running is a no-op.
    pub fn start(&self) {
        let mut worker = self.worker.lock().expect("health monitor mutex poisoned");
        if worker.is_some() {
            return;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            timeout_secs = self.config.timeout_secs,
            backends = self.registry.len(),
            "Health monitor starting"
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let probe_loop = ProbeLoop {
            registry: self.registry.clone(),
            config: self.config.clone(),
            client: self.client.clone(),
            events: self.events.clone(),
        };
        let handle = tokio::spawn(probe_loop.run(stop_rx));

        *worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
    }

    /// Signal the worker and wait until it has exited.
    ///
    /// Any probe already in flight finishes and its result is recorded; no
    /// new probe begins once the signal is observed. A no-op when the
    /// monitor is not running.
    pub async fn stop(&self) {
        let worker = self
            .worker
            .lock()
            .expect("health monitor mutex poisoned")
            .take();
        if let Some(worker) = worker {
            let _ = worker.stop.send(true);
            let _ = worker.handle.await;
            tracing::info!("Health monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .expect("health monitor mutex poisoned")
            .is_some()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        // Drop cannot await the join, so the worker is only signalled here;
        // it exits at its next cancellation check. A poisoned lock means a
        // panic is already unwinding, so the signal is skipped.
        if let Ok(mut worker) = self.worker.lock() {
            if let Some(worker) = worker.take() {
                let _ = worker.stop.send(true);
            }
        }
    }
}

/// The spawned probe worker. Owns clones of everything it touches so the
/// task is `'static`.
struct ProbeLoop {
    registry: Arc<BackendRegistry>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
    events: Arc<dyn EventSink>,
}

impl ProbeLoop {
    async fn run(self, mut stop: watch::Receiver<bool>) {
        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        'rounds: loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop.changed() => break 'rounds,
            }

            for backend in self.registry.all() {
                // Checked between probes as well, so stop() never waits for
                // a whole round, only for the probe in flight.
                if *stop.borrow() {
                    break 'rounds;
                }
                self.probe(&backend).await;
            }
        }

        tracing::debug!("Probe worker exiting");
    }

    async fn probe(&self, backend: &Arc<Backend>) {
        let was_healthy = backend.is_healthy();
        let started = Instant::now();
        let healthy = self.check(backend).await;

        self.registry.set_health(backend.index(), healthy);
        self.events.probe_result(backend, healthy, started.elapsed());
        if was_healthy != healthy {
            self.events.health_transition(backend, healthy);
        }
    }

    /// One probe: GET the backend's health endpoint, bounded by the
    /// configured timeout. Healthy means status 200 exactly; anything else,
    /// including transport errors and timeouts, is unhealthy.
    async fn check(&self, backend: &Backend) -> bool {
        let request = match Request::builder()
            .method(Method::GET)
            .uri(backend.probe_url())
            .header(header::USER_AGENT, "roundabout-health-check")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(error) => {
                tracing::error!(error = %error, "Failed to build health probe request");
                return false;
            }
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response.status() == StatusCode::OK,
            Ok(Err(_)) | Err(_) => false,
        }
    }
}
