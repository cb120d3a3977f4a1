//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! prober / pipeline produce:
//!     → events.rs (EventSink trait, one method per event point)
//!
//! Consumers:
//!     → TracingEvents (default, structured tracing fields)
//!     → test sinks (capture events for assertions)
//! ```
//!
//! # Design Decisions
//! - Components receive their sink at construction; nothing reports through
//!   a process-wide handle, so tests can observe events by injecting a sink
//! - The core reports facts only; formatting and persistence live in the sink

pub mod events;

pub use events::{EventSink, TracingEvents};
