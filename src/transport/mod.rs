//! Enforcing transport subsystem.
//!
//! # Data Flow
//! ```text
//! Caller request
//!     → service.rs (Decide: plain scheme and store.contains(host)?)
//!         yes → redirect.rs (synthetic 307 to the https URL), executor not called
//!         no  → wrapped executor (e.g. upstream.rs)
//!     → secure response with Strict-Transport-Security
//!         → policy::header parse → store.add
//!     → Caller
//! ```

pub mod error;
pub mod redirect;
pub mod service;
pub mod upstream;

pub use error::{RedirectError, TransportError};
pub use redirect::{build_redirect, request_host, secure_uri, HSTS_REASON, NON_AUTHORITATIVE_REASON};
pub use service::{HstsLayer, HstsService};
pub use upstream::UpstreamClient;
