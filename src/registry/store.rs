//! Backend registry.
//!
//! # Responsibilities
//! - Own the fixed backend set (construction order is selection order)
//! - Serve point-in-time snapshots to selection and probing paths
//! - Apply health writes from the monitor

use std::sync::Arc;

use crate::config::BackendConfig;
use crate::registry::backend::Backend;

/// Fixed-membership registry of upstream backends.
///
/// Membership never changes after construction; only per-backend health
/// state moves. Snapshots clone `Arc` handles and take no lock, so readers
/// never wait on the health writer.
#[derive(Debug)]
pub struct BackendRegistry {
    backends: Vec<Arc<Backend>>,
}

impl BackendRegistry {
    /// Build the registry from configured backends, preserving order.
    pub fn from_config(configs: &[BackendConfig]) -> Self {
        let backends = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                Arc::new(Backend::new(
                    index,
                    config.host.clone(),
                    config.port,
                    config.health_path.clone(),
                ))
            })
            .collect();

        Self { backends }
    }

    /// Snapshot of every backend, in registration order.
    pub fn all(&self) -> Vec<Arc<Backend>> {
        self.backends.to_vec()
    }

    /// Snapshot of the backends whose health flag reads true right now.
    ///
    /// A returned backend may turn unhealthy before the caller finishes with
    /// it; the forwarding path reports that as a connection failure.
    pub fn healthy(&self) -> Vec<Arc<Backend>> {
        self.backends
            .iter()
            .filter(|backend| backend.is_healthy())
            .cloned()
            .collect()
    }

    /// Record a probe outcome for the backend at `index`.
    ///
    /// Out-of-range indexes are ignored. The monitor derives every index it
    /// writes from this registry, so a miss is a caller bug, not a race.
    pub fn set_health(&self, index: usize, healthy: bool) {
        if let Some(backend) = self.backends.get(index) {
            backend.record_health(healthy);
        }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
