//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (probe.rs):
//!     GET base_url + health_check_path, bounded timeout
//!     → bool reachability, never an error
//!
//! Monitor (monitor.rs):
//!     Periodic timer
//!     → probe the currently selected service
//!     → on failure, run the failover selector and reassign the
//!       current index, even with no request in flight
//! ```
//!
//! # Design Decisions
//! - A probe is a liveness signal, not a data fetch: every failure mode
//!   (timeout, transport error, non-2xx) collapses to `false`
//! - The monitor only watches the selected service; candidates are probed
//!   on demand by the failover selector

pub mod monitor;
pub mod probe;

pub use monitor::HealthMonitor;
pub use probe::HealthProbe;
