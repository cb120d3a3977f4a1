//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server (host, port, probe path)
//! - Carry the health flag read by selection paths
//! - Record when the backend was last probed

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// A single upstream server, fixed at construction.
///
/// The health flag and probe timestamp are the only mutable state; both are
/// written through [`crate::registry::BackendRegistry::set_health`]. Backends
/// start healthy and the first probe round corrects that optimism.
#[derive(Debug)]
pub struct Backend {
    /// Position in the registry, stable for the process lifetime.
    index: usize,
    host: String,
    port: u16,
    health_path: String,
    healthy: AtomicBool,
    last_probed: Mutex<Option<Instant>>,
}

impl Backend {
    pub(crate) fn new(index: usize, host: String, port: u16, health_path: String) -> Self {
        Self {
            index,
            host,
            port,
            health_path,
            healthy: AtomicBool::new(true),
            last_probed: Mutex::new(None),
        }
    }

    /// Registry position of this backend.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path probed by the health monitor.
    pub fn health_path(&self) -> &str {
        &self.health_path
    }

    /// `host:port` form used as the outbound request authority.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL of the health probe endpoint.
    pub fn probe_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.health_path)
    }

    /// Current health flag.
    ///
    /// Advisory by nature: the flag may flip between this read and whatever
    /// the caller does with the answer.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// When the monitor last finished probing this backend, if ever.
    pub fn last_probed(&self) -> Option<Instant> {
        *self.last_probed.lock().expect("probe timestamp mutex poisoned")
    }

    /// Record a probe outcome.
    ///
    /// The Release store pairs with the Acquire in `is_healthy`: once a
    /// probe result lands, every later snapshot observes it.
    pub(crate) fn record_health(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Release);
        *self.last_probed.lock().expect("probe timestamp mutex poisoned") = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_starts_healthy() {
        let backend = Backend::new(0, "127.0.0.1".to_string(), 9001, "/health".to_string());
        assert!(backend.is_healthy());
        assert!(backend.last_probed().is_none());
    }

    #[test]
    fn test_addresses() {
        let backend = Backend::new(2, "10.0.0.5".to_string(), 8080, "/status".to_string());
        assert_eq!(backend.index(), 2);
        assert_eq!(backend.authority(), "10.0.0.5:8080");
        assert_eq!(backend.probe_url(), "http://10.0.0.5:8080/status");
    }

    #[test]
    fn test_record_health_sets_timestamp() {
        let backend = Backend::new(0, "127.0.0.1".to_string(), 9001, "/health".to_string());
        backend.record_health(false);
        assert!(!backend.is_healthy());
        assert!(backend.last_probed().is_some());

        backend.record_health(true);
        assert!(backend.is_healthy());
    }
}
