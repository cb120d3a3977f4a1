//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Periodic timer (one worker, one probe at a time)
//!     → GET each backend's health endpoint
//!     → 200 within timeout = healthy, anything else = unhealthy
//!     → registry.set_health()
//!     → probe / transition events to the sink
//! ```
//!
//! # Design Decisions
//! - A single flag flip per probe; no thresholds, the latest probe result
//!   is the state
//! - The worker observes its stop signal between probes, so shutdown waits
//!   for at most one probe in flight

pub mod monitor;

pub use monitor::HealthMonitor;
