//! Backend selection subsystem.
//!
//! # Data Flow
//! ```text
//! registry.healthy() snapshot
//!     → RoutingPolicy::select
//!         - round_robin.rs (rotate through the set)
//!         - random.rs (uniform pick)
//!     → Arc<Backend> or NoHealthyBackends
//! ```
//!
//! # Design Decisions
//! - The policy is chosen once at startup and shared as a trait object
//! - Policies never see unhealthy backends; the registry filters first
//! - Selection state is at most one atomic counter, so it never blocks

pub mod policy;
pub mod random;
pub mod round_robin;

pub use policy::{NoHealthyBackends, RoutingPolicy};
pub use random::Random;
pub use round_robin::RoundRobin;

use std::sync::Arc;

use crate::config::PolicyKind;

/// Instantiate the configured selection policy.
pub fn create_policy(kind: PolicyKind) -> Arc<dyn RoutingPolicy> {
    match kind {
        PolicyKind::RoundRobin => Arc::new(RoundRobin::new()),
        PolicyKind::Random => Arc::new(Random::new()),
        PolicyKind::LeastConnections => {
            // Needs a per-backend in-flight counter the registry does not
            // track.
            tracing::warn!("least-connections is not implemented, using round-robin");
            Arc::new(RoundRobin::new())
        }
    }
}
