//! Background health monitoring.
//!
//! # Responsibilities
//! - Periodically probe the currently selected service
//! - Fail over proactively when it goes unhealthy, so a dead backend is
//!   rerouted before the next request rather than only on first failure

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::failover::selector::FailoverSelector;
use crate::health::probe::HealthProbe;
use crate::observability::metrics;
use crate::services::registry::ServiceRegistry;

pub struct HealthMonitor {
    registry: Arc<ServiceRegistry>,
    probe: HealthProbe,
    selector: FailoverSelector,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        probe: HealthProbe,
        selector: FailoverSelector,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            probe,
            selector,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_current().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn check_current(&self) {
        let index = self.registry.current_index();
        let service = self.registry.get(index);

        if self.probe.check_and_record(&service).await {
            return;
        }

        tracing::warn!(
            service = %service.name,
            "Selected service unhealthy, starting failover search"
        );

        match self.selector.select_next(index).await {
            Some(next) => {
                let target = self.registry.get(next);
                self.registry.set_current(next);
                tracing::info!(
                    from = %service.name,
                    to = %target.name,
                    "Failed over to healthy service"
                );
                metrics::record_failover(&service.name, &target.name);
            }
            None => {
                tracing::error!("No reachable backend service, keeping current selection");
            }
        }
    }
}
