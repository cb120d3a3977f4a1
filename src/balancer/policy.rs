//! The selection policy contract.

use std::sync::Arc;

use thiserror::Error;

use crate::registry::Backend;

/// Returned when a selection is attempted over an empty healthy set.
///
/// The message doubles as the client-facing error body, so its exact wording
/// is part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No healthy backends available")]
pub struct NoHealthyBackends;

/// A strategy for choosing one backend from the healthy set.
///
/// Implementations are shared across every request handler, so any internal
/// state has to be self-synchronizing. Selection must not block.
pub trait RoutingPolicy: Send + Sync {
    /// Pick one backend from `healthy`, or fail when the set is empty.
    ///
    /// The slice is a point-in-time snapshot owned by the caller; the policy
    /// never mutates it and never sees backends whose flag read false.
    fn select(&self, healthy: &[Arc<Backend>]) -> Result<Arc<Backend>, NoHealthyBackends>;

    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Return a stateful policy to its initial position. No-op by default.
    fn reset(&self) {}
}
