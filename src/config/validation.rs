//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check registry invariants (non-empty, unique names, valid URLs)
//! - Validate value ranges (intervals and timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic fault in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backend services configured")]
    NoServices,

    #[error("duplicate service name '{0}'")]
    DuplicateName(String),

    #[error("service '{name}' has invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("service '{0}' health check path must start with '/'")]
    InvalidHealthPath(String),

    #[error("health check interval must be greater than zero")]
    ZeroInterval,

    #[error("health check timeout must be greater than zero")]
    ZeroProbeTimeout,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every fault.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateName(service.name.clone()));
        }

        match Url::parse(&service.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
                name: service.name.clone(),
                url: service.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidBaseUrl {
                name: service.name.clone(),
                url: service.base_url.clone(),
                reason: e.to_string(),
            }),
        }

        if !service.health_check_path.starts_with('/') {
            errors.push(ValidationError::InvalidHealthPath(service.name.clone()));
        }
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
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
    use crate::config::schema::ServiceConfig;

    fn service(name: &str, base_url: &str) -> ServiceConfig {
        ServiceConfig {
            name: name.to_string(),
            base_url: base_url.to_string(),
            health_check_path: "/health".to_string(),
        }
    }

    #[test]
    fn test_empty_services_rejected() {
        let config = FailoverConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoServices));
    }

    #[test]
    fn test_valid_config_accepted() {
        let mut config = FailoverConfig::default();
        config.services.push(service("a", "https://a.example.com"));
        config.services.push(service("b", "http://b.example.com:8080"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FailoverConfig::default();
        config.services.push(service("a", "not a url"));
        config.services.push(service("a", "ftp://a.example.com"));
        config.health_check.interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::DuplicateName("a".to_string())));
        assert!(errors.contains(&ValidationError::ZeroInterval));
    }

    #[test]
    fn test_health_path_must_be_absolute() {
        let mut config = FailoverConfig::default();
        let mut bad = service("a", "https://a.example.com");
        bad.health_check_path = "health".to_string();
        config.services.push(bad);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidHealthPath("a".to_string())));
    }
}
