//! Session credential management subsystem.
//!
//! # Data Flow
//! ```text
//! Login (caller) → credentials.rs (lock-free cache) + store.rs (persisted)
//!
//! Request path reads the cache on every dispatch.
//!
//! 401 observed:
//!     → refresher.rs (single-flight POST to the refresh endpoint)
//!     → success: cache + store replaced, waiters adopt the new token
//!     → failure: cache + store cleared, SessionExpired surfaced
//! ```
//!
//! # Design Decisions
//! - At most one refresh call in flight regardless of how many requests
//!   hit 401 concurrently; waiters queue on a fair mutex and a generation
//!   counter tells them a refresh completed while they waited
//! - Refresh failure is terminal for the session; force-logout semantics
//!   belong to the caller, triggered by the propagated error
//! - Persistence is a pluggable trait so any key-value store can back it

pub mod credentials;
pub mod refresher;
pub mod store;

pub use credentials::{CredentialCache, SessionCredentials};
pub use refresher::TokenRefresher;
pub use store::{MemoryTokenStore, TokenStore};
