//! Backend service registry subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig list (validated)
//!     → registry.rs (build ordered Vec<Arc<BackendService>>)
//!     → backend.rs (per-service health state, probed by health subsystem)
//!     → current index read on every request, reassigned on failover
//! ```
//!
//! # Design Decisions
//! - The service list is fixed for the life of the client; only health
//!   state and the current index change at runtime
//! - Current index updates are plain atomic stores: concurrent failovers
//!   race last-writer-wins, an accepted and documented limitation
//! - Health state is per-service and in-memory only; it is rebuilt fresh
//!   on restart

pub mod backend;
pub mod registry;

pub use backend::{BackendService, HealthState};
pub use registry::ServiceRegistry;
