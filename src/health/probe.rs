//! Liveness probing.
//!
//! # Responsibilities
//! - Issue a bounded-timeout GET against a service's health check path
//! - Convert every failure mode to `false`

use std::time::Duration;

use reqwest::header::USER_AGENT;
use std::sync::Arc;

use crate::services::backend::BackendService;

const PROBE_USER_AGENT: &str = "api-failover-health-check";

/// Bounded-timeout liveness probe.
#[derive(Clone)]
pub struct HealthProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Probe a service. Returns `true` iff the response status is 2xx.
    ///
    /// Never errors: timeouts, transport failures, and non-2xx statuses all
    /// yield `false`. The caller records the result on the service.
    pub async fn check(&self, service: &BackendService) -> bool {
        let url = service.health_endpoint();

        match self
            .client
            .get(&url)
            .header(USER_AGENT, PROBE_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let healthy = response.status().is_success();
                if !healthy {
                    tracing::warn!(
                        service = %service.name,
                        status = %response.status(),
                        "Health probe failed: non-success status"
                    );
                }
                healthy
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(service = %service.name, "Health probe failed: timeout");
                false
            }
            Err(e) => {
                tracing::warn!(service = %service.name, error = %e, "Health probe failed: connection error");
                false
            }
        }
    }

    /// Probe a service and record the outcome on it.
    pub async fn check_and_record(&self, service: &Arc<BackendService>) -> bool {
        let healthy = self.check(service).await;
        service.record_probe(healthy);
        crate::observability::metrics::record_service_health(&service.name, healthy);
        healthy
    }
}
