//! Round-robin selection policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::balancer::policy::{NoHealthyBackends, RoutingPolicy};
use crate::registry::Backend;

/// Rotates through the healthy set with a single shared counter.
///
/// Over a stable set of size K, K consecutive selections visit each member
/// exactly once in registration order. When the set changes between calls the
/// rotation lands wherever the counter modulo the new size points, which can
/// skip or repeat a member once; that is the price of lock-free selection.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoutingPolicy for RoundRobin {
    fn select(&self, healthy: &[Arc<Backend>]) -> Result<Arc<Backend>, NoHealthyBackends> {
        if healthy.is_empty() {
            return Err(NoHealthyBackends);
        }

        // Relaxed is enough: the increment only has to be atomic, it is not
        // ordered against the health flags.
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % healthy.len();
        Ok(healthy[index].clone())
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }
}
