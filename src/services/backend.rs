//! Backend service abstraction.
//!
//! # Responsibilities
//! - Represent a single backend service endpoint
//! - Track health state (Unknown/Healthy/Unhealthy) and probe recency
//! - Build request URLs from the service origin

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use url::Url;

use crate::config::schema::ServiceConfig;
use crate::config::validation::ValidationError;

/// Health state enum.
///
/// `Unknown` means the service has never been probed and counts as usable.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// A single backend service.
#[derive(Debug)]
pub struct BackendService {
    /// Identifier, unique within the registry.
    pub name: String,
    /// Origin for requests.
    pub base_url: Url,
    /// Relative path probed for liveness.
    pub health_check_path: String,
    /// Display marker: set while this service is the selected one.
    /// Cosmetic only; routing never reads it.
    pub is_active: AtomicBool,

    /// Current health state (0=Unknown, 1=Healthy, 2=Unhealthy).
    state: AtomicU8,
    /// Milliseconds since the epoch of the last probe, 0 = never probed.
    last_checked_ms: AtomicU64,
}

impl BackendService {
    /// Build a service from its validated configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ValidationError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ValidationError::InvalidBaseUrl {
            name: config.name.clone(),
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: config.name.clone(),
            base_url,
            health_check_path: config.health_check_path.clone(),
            is_active: AtomicBool::new(false),
            state: AtomicU8::new(HealthState::Unknown as u8),
            last_checked_ms: AtomicU64::new(0),
        })
    }

    /// Absolute URL for a request path against this service.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Absolute URL of the liveness probe.
    pub fn health_endpoint(&self) -> String {
        self.endpoint(&self.health_check_path)
    }

    /// Return true unless the last probe marked this service unhealthy.
    pub fn is_healthy(&self) -> bool {
        self.state.load(Ordering::Relaxed) != (HealthState::Unhealthy as u8)
    }

    /// Current health state.
    pub fn health_state(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Relaxed))
    }

    /// Record a probe outcome.
    pub fn record_probe(&self, healthy: bool) {
        let state = if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        self.state.store(state as u8, Ordering::Relaxed);

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;
        self.last_checked_ms.store(now_ms, Ordering::Relaxed);
    }

    /// When the service was last probed, if ever.
    pub fn last_checked(&self) -> Option<SystemTime> {
        match self.last_checked_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(UNIX_EPOCH + Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> BackendService {
        BackendService::from_config(&ServiceConfig {
            name: "test".to_string(),
            base_url: base_url.to_string(),
            health_check_path: "/health".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_unknown_counts_as_healthy() {
        let s = service("https://api.example.com");
        assert_eq!(s.health_state(), HealthState::Unknown);
        assert!(s.is_healthy());
        assert!(s.last_checked().is_none());
    }

    #[test]
    fn test_probe_transitions() {
        let s = service("https://api.example.com");

        s.record_probe(false);
        assert_eq!(s.health_state(), HealthState::Unhealthy);
        assert!(!s.is_healthy());
        assert!(s.last_checked().is_some());

        s.record_probe(true);
        assert_eq!(s.health_state(), HealthState::Healthy);
        assert!(s.is_healthy());
    }

    #[test]
    fn test_endpoint_joining() {
        // Url normalizes a bare origin to a trailing slash; both spellings
        // must produce the same request URL.
        let s = service("https://api.example.com");
        assert_eq!(s.endpoint("/api/me"), "https://api.example.com/api/me");

        let s = service("https://api.example.com/");
        assert_eq!(s.endpoint("/api/me"), "https://api.example.com/api/me");
        assert_eq!(s.health_endpoint(), "https://api.example.com/health");
    }

    #[test]
    fn test_rejects_invalid_url() {
        let result = BackendService::from_config(&ServiceConfig {
            name: "bad".to_string(),
            base_url: "not a url".to_string(),
            health_check_path: "/health".to_string(),
        });
        assert!(result.is_err());
    }
}
