//! Round-robin failover selection.

use std::sync::Arc;

use crate::health::probe::HealthProbe;
use crate::services::registry::ServiceRegistry;

/// Round-robin candidate search over the service registry.
#[derive(Clone)]
pub struct FailoverSelector {
    registry: Arc<ServiceRegistry>,
    probe: HealthProbe,
}

impl FailoverSelector {
    pub fn new(registry: Arc<ServiceRegistry>, probe: HealthProbe) -> Self {
        Self { registry, probe }
    }

    /// Find the next reachable service.
    ///
    /// Probes `registry.len()` candidates starting at `(current + 1) % len`,
    /// wrapping so every other service is tried before the current one is
    /// reconsidered last. Returns the index of the first candidate that
    /// probes healthy, or `None` when the full cycle finds no survivor.
    pub async fn select_next(&self, current: usize) -> Option<usize> {
        let services = self.registry.services();
        let len = services.len();

        for offset in 1..=len {
            let index = (current + offset) % len;
            let service = &services[index];

            tracing::debug!(
                candidate = %service.name,
                index,
                "Probing failover candidate"
            );

            if self.probe.check_and_record(service).await {
                return Some(index);
            }
        }

        None
    }
}
