//! Service registry management.
//!
//! # Responsibilities
//! - Hold the fixed, ordered list of backend services
//! - Track which service is currently selected
//! - Keep the cosmetic `is_active` markers in sync with selection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::schema::ServiceConfig;
use crate::config::validation::ValidationError;
use crate::services::backend::BackendService;

/// The ordered candidate list plus the current selection.
///
/// List order is priority order: index 0 is the preferred service and the
/// initial selection. The index is updated with plain stores; concurrent
/// failovers race last-writer-wins.
#[derive(Debug)]
pub struct ServiceRegistry {
    services: Vec<Arc<BackendService>>,
    current: AtomicUsize,
}

impl ServiceRegistry {
    /// Build a registry from validated configuration.
    pub fn from_config(configs: &[ServiceConfig]) -> Result<Self, ValidationError> {
        if configs.is_empty() {
            return Err(ValidationError::NoServices);
        }

        let mut services = Vec::with_capacity(configs.len());
        for config in configs {
            services.push(Arc::new(BackendService::from_config(config)?));
        }
        services[0].is_active.store(true, Ordering::Relaxed);

        Ok(Self {
            services,
            current: AtomicUsize::new(0),
        })
    }

    /// The fixed candidate list, in priority order.
    pub fn services(&self) -> &[Arc<BackendService>] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service at the given index, wrapping modulo the list length.
    pub fn get(&self, index: usize) -> Arc<BackendService> {
        self.services[index % self.services.len()].clone()
    }

    /// Index of the currently selected service.
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// The currently selected service.
    pub fn current(&self) -> Arc<BackendService> {
        self.get(self.current_index())
    }

    /// Select a new service. Last writer wins under concurrent failovers.
    pub fn set_current(&self, index: usize) {
        let index = index % self.services.len();
        self.current.store(index, Ordering::Relaxed);

        for (i, service) in self.services.iter().enumerate() {
            service.is_active.store(i == index, Ordering::Relaxed);
        }
    }

    /// Name of the currently selected service.
    pub fn active_service_name(&self) -> String {
        self.current().name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs(names: &[&str]) -> Vec<ServiceConfig> {
        names
            .iter()
            .map(|name| ServiceConfig {
                name: name.to_string(),
                base_url: format!("https://{}.example.com", name),
                health_check_path: "/health".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_initial_selection_is_first() {
        let registry = ServiceRegistry::from_config(&configs(&["a", "b"])).unwrap();
        assert_eq!(registry.current_index(), 0);
        assert_eq!(registry.active_service_name(), "a");
        assert!(registry.services()[0].is_active.load(Ordering::Relaxed));
        assert!(!registry.services()[1].is_active.load(Ordering::Relaxed));
    }

    #[test]
    fn test_set_current_moves_active_marker() {
        let registry = ServiceRegistry::from_config(&configs(&["a", "b", "c"])).unwrap();
        registry.set_current(2);

        assert_eq!(registry.active_service_name(), "c");
        assert!(!registry.services()[0].is_active.load(Ordering::Relaxed));
        assert!(registry.services()[2].is_active.load(Ordering::Relaxed));
    }

    #[test]
    fn test_set_current_wraps() {
        let registry = ServiceRegistry::from_config(&configs(&["a", "b"])).unwrap();
        registry.set_current(3);
        assert_eq!(registry.current_index(), 1);
    }

    #[test]
    fn test_empty_config_rejected() {
        assert!(ServiceRegistry::from_config(&[]).is_err());
    }
}
