//! Proxying subsystem.
//!
//! # Data Flow
//! ```text
//! axum handler
//!     → pipeline.rs (select backend, forward, classify failures)
//!     → rewrite.rs (annotate the buffered body by content type)
//!     → error.rs (failures rendered as 503 + JSON error body)
//! ```
//!
//! # Design Decisions
//! - Responses are fully buffered before rewriting; streaming bodies are
//!   out of scope and the annotator needs the whole payload anyway
//! - A request is tried against exactly one backend; no retries, a failure
//!   is reported to the client immediately

pub mod error;
pub mod pipeline;
pub mod rewrite;

pub use error::ProxyError;
pub use pipeline::ProxyPipeline;
