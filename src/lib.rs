//! Concurrent reverse-proxy load balancer.
//!
//! Accepts HTTP requests, picks a healthy upstream backend through a
//! pluggable selection policy, forwards the request, and annotates the
//! response body so every reply names the backend that produced it. A
//! background monitor probes each backend's health endpoint and keeps the
//! registry's health flags current.

pub mod balancer;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod registry;
pub mod server;

pub use config::ProxyConfig;
pub use lifecycle::Shutdown;
pub use server::HttpServer;
