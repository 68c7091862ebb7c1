//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method, status, service
//! - `api_request_duration_seconds` (histogram): end-to-end latency,
//!   including any failover or refresh replay
//! - `api_failovers_total` (counter): selection changes by from/to service
//! - `api_token_refreshes_total` (counter): refresh attempts by outcome
//! - `api_service_health` (gauge): 1=healthy, 0=unhealthy, per service
//!
//! # Design Decisions
//! - Emit through the `metrics` facade only; the host application installs
//!   its own recorder/exporter

use std::time::Instant;

use metrics::{counter, gauge, histogram};

/// Record a completed request. `status` is the HTTP status, or "error"
/// when the request never produced a response.
pub fn record_request(method: &str, status: &str, service: &str, started: Instant) {
    counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);

    histogram!(
        "api_request_duration_seconds",
        "method" => method.to_string(),
        "service" => service.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a failover from one service to another.
pub fn record_failover(from: &str, to: &str) {
    counter!(
        "api_failovers_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record a token refresh attempt.
pub fn record_refresh(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("api_token_refreshes_total", "outcome" => outcome).increment(1);
}

/// Record a probe outcome for a service.
pub fn record_service_health(service: &str, healthy: bool) {
    gauge!("api_service_health", "service" => service.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
