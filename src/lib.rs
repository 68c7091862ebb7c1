//! Client-side backend failover library.
//!
//! Maintains an ordered registry of backend services, probes their health,
//! routes requests to the currently selected service, and recovers from
//! failures along two paths:
//!
//! - transport errors, timeouts, and gateway statuses trigger a round-robin
//!   failover search followed by exactly one replay of the request
//! - `401 Unauthorized` triggers a single-flight token refresh followed by
//!   exactly one replay with the new token
//!
//! A background monitor re-probes the selected service on an interval and
//! fails over proactively, so a dead backend is rerouted before the next
//! caller notices.

// Core subsystems
pub mod client;
pub mod config;
pub mod services;

// Failure handling
pub mod failover;
pub mod health;

// Session management
pub mod auth;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use auth::store::{MemoryTokenStore, TokenStore};
pub use client::error::ApiError;
pub use client::request::{ApiClient, RequestOptions};
pub use config::FailoverConfig;
pub use lifecycle::cancel::{cancel_pair, CancelToken, Canceller};
pub use lifecycle::shutdown::Shutdown;
