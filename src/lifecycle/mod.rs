//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     ApiClient::shutdown → broadcast signal → background monitor exits
//!
//! Cancellation (cancel.rs):
//!     Caller holds a Canceller, passes its CancelToken with a request
//!     → Canceller::cancel races the in-flight call → ApiError::Cancelled
//! ```
//!
//! # Design Decisions
//! - Shutdown is broadcast so any number of background tasks can subscribe
//! - Cancellation is a watch channel: a token observed after the signal
//!   fired still sees it, and dropping the Canceller without firing never
//!   cancels the request

pub mod cancel;
pub mod shutdown;

pub use cancel::{CancelToken, Canceller};
pub use shutdown::Shutdown;
