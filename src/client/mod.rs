//! Request façade subsystem.
//!
//! # Data Flow
//! ```text
//! get/post/put/patch/delete
//!     → request.rs (attach bearer, dispatch against current service)
//!     → 2xx: return response
//!     → 401: auth::refresher (single-flight) → replay once
//!     → transport error / timeout / 502 / 503 / 504:
//!         failover::selector → reassign current → replay once
//!     → anything else: reject immediately, body preserved
//! ```
//!
//! # Design Decisions
//! - Bounded attempt count: a request is sent at most twice, never more
//! - When the post-failover replay also fails, the original error is
//!   surfaced and the replay failure is only logged
//! - One structured log line per request, carrying a generated request id
//!   that is also propagated upstream as x-request-id

pub mod error;
pub mod request;

pub use error::ApiError;
pub use request::{ApiClient, RequestOptions};
