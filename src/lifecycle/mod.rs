//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     HstsConfig → restore snapshot → apply pins → spawn sweeper
//!
//! Shutdown (startup.rs, HstsRuntime::shutdown):
//!     broadcast signal → sweeper exits → snapshot written
//! ```
//!
//! # Design Decisions
//! - Fail fast: a malformed snapshot aborts startup instead of starting empty
//! - Pins are applied after the snapshot so configuration always wins

pub mod startup;

pub use startup::{init_store, HstsRuntime, StartupError};
