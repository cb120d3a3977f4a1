//! Backend registry subsystem.
//!
//! # Data Flow
//! ```text
//! config backends
//!     → BackendRegistry::from_config (fixed membership, all healthy)
//!     → healthy() snapshots feed the selection policy
//!     → set_health() writes land from the health monitor
//! ```
//!
//! # Design Decisions
//! - The registry is the single owner of backend state; the monitor and the
//!   pipeline hold `Arc` handles to it, never copies of the set
//! - Health flags are advisory: a snapshot can go stale mid-request and the
//!   forwarding path absorbs that as a normal upstream failure

pub mod backend;
pub mod store;

pub use backend::Backend;
pub use store::BackendRegistry;
