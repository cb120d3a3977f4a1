//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT
//!     → wait_for_signal
//!     → Shutdown::trigger (broadcast to subscribers)
//!     → server stops accepting, drains in-flight requests
//!     → HealthMonitor::stop joins the probe worker
//!     → process exits
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accepting first, probe worker last
//! - One broadcast channel; tasks subscribe before they are spawned

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
