//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store + transport produce:
//!     → tracing events (upgrades, learned/evicted policy, purges)
//!     → metrics.rs (counters, store size gauge)
//!
//! Binaries consume:
//!     → logging.rs (subscriber setup)
//! ```

pub mod logging;
pub mod metrics;
