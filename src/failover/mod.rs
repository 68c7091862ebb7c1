//! Failover subsystem.
//!
//! # Data Flow
//! ```text
//! Retryable failure (or monitor detects current unhealthy)
//!     → selector.rs (probe candidates in round-robin order,
//!       starting after the current index, current reconsidered last)
//!     → Some(index) of first healthy candidate, or None when every
//!       service is down
//!     → caller reassigns the registry's current index
//! ```
//!
//! # Design Decisions
//! - Candidates are probed sequentially, not in parallel: the first
//!   healthy one wins and later candidates are spared the traffic
//! - The selector never advances the shared index itself; the caller
//!   assigns the winner, so concurrent failovers race last-writer-wins
//! - A full cycle with no survivor returns None and the caller surfaces
//!   the original failure rather than retrying indefinitely

pub mod selector;

pub use selector::FailoverSelector;
