//! Policy subsystem.
//!
//! # Data Flow
//! ```text
//! Secure response with Strict-Transport-Security
//!     → header.rs (directives: includeSubDomains, max-age)
//!     → record.rs (PolicyRecord stamped with clock.rs time)
//!     → handed to the store
//!
//! Enforcement query
//!     → store lookup picks a candidate record
//!     → record.rs decides (suffix match, subdomains, expiry)
//! ```

pub mod clock;
pub mod header;
pub mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use header::{parse_header, HstsDirectives, DEFAULT_FALLBACK_MAX_AGE};
pub use record::PolicyRecord;
