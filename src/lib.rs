//! HTTP Strict Transport Security enforcement for outgoing requests.
//!
//! Wraps any request executor (`tower::Service`) so that plain-HTTP requests to
//! hosts with a known HSTS policy are answered locally with a `307` redirect to
//! the `https` URL, and secure responses carrying `Strict-Transport-Security`
//! teach the shared policy store.
//!
//! ```text
//! caller → HstsService ──(plain + covered host)──▶ synthetic 307
//!               │
//!               └──▶ executor → response ──(https + STS)──▶ PolicyStore::add
//! ```

// Core
pub mod policy;
pub mod store;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::HstsConfig;
pub use lifecycle::HstsRuntime;
pub use policy::{Clock, ManualClock, PolicyRecord, SystemClock};
pub use store::{MemoryStore, PolicyStore};
pub use transport::{HstsLayer, HstsService, TransportError, UpstreamClient};
