//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, one line per request)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → whatever subscriber/recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - This crate emits; the host application decides where logs and
//!   metrics go (a library installs no exporter)
//! - Request IDs flow through log lines and the x-request-id header
//! - Metric updates are cheap label-based macro calls

pub mod logging;
pub mod metrics;
