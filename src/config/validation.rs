//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check backend addresses are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Listener bind address does not parse as `host:port`.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// The backend list is empty.
    #[error("at least one backend is required")]
    NoBackends,

    /// Backend host is not a valid hostname or IP address.
    #[error("backend {index}: invalid host '{host}'")]
    InvalidHost { index: usize, host: String },

    /// Backend port is zero.
    #[error("backend {index}: port must be non-zero")]
    InvalidPort { index: usize },

    /// Health path does not start with a slash.
    #[error("backend {index}: health path must start with '/'")]
    InvalidHealthPath { index: usize },

    /// Health check interval is zero.
    #[error("health check interval must be greater than zero")]
    ZeroHealthInterval,

    /// Health check timeout is zero.
    #[error("health check timeout must be greater than zero")]
    ZeroHealthTimeout,

    /// Upstream connect timeout is zero.
    #[error("connect timeout must be greater than zero")]
    ZeroConnectTimeout,

    /// Upstream request timeout is zero.
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for (index, backend) in config.backends.iter().enumerate() {
        if url::Host::parse(&backend.host).is_err() {
            errors.push(ValidationError::InvalidHost {
                index,
                host: backend.host.clone(),
            });
        }
        if backend.port == 0 {
            errors.push(ValidationError::InvalidPort { index });
        }
        if !backend.health_path.starts_with('/') {
            errors.push(ValidationError::InvalidHealthPath { index });
        }
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroHealthInterval);
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroHealthTimeout);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;

    fn valid_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.backends.push(BackendConfig {
            host: "127.0.0.1".to_string(),
            port: 9001,
            health_path: "/health".to_string(),
        });
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_backends_rejected() {
        let config = ProxyConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoBackends));
    }

    #[test]
    fn test_bad_backend_fields() {
        let mut config = valid_config();
        config.backends.push(BackendConfig {
            host: String::new(),
            port: 0,
            health_path: "health".to_string(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidHost {
            index: 1,
            host: String::new(),
        }));
        assert!(errors.contains(&ValidationError::InvalidPort { index: 1 }));
        assert!(errors.contains(&ValidationError::InvalidHealthPath { index: 1 }));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.health_check.interval_secs = 0;
        config.health_check.timeout_secs = 0;
        config.timeouts.connect_secs = 0;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        // One per broken field plus the empty backend list.
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_hostname_accepted() {
        let mut config = valid_config();
        config.backends[0].host = "backend.internal".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
