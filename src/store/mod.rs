//! Policy storage subsystem.
//!
//! # Data Flow
//! ```text
//! contains(host)
//!     → memory.rs exact-key lookup
//!     → else walk parent domains (a.b.example.com → b.example.com → example.com → com)
//!     → first hit decides via PolicyRecord::applies
//!
//! add(record)
//!     → zero max-age, not permanent: evict unless the stored record is permanent
//!     → otherwise overwrite (last write wins)
//!
//! Optional:
//!     snapshot.rs (JSON save/restore)
//!     sweeper.rs (periodic purge of expired records)
//! ```
//!
//! # Design Decisions
//! - One store-wide lock; operations are O(number of labels)
//! - Expiry is evaluated lazily at query time

pub mod memory;
pub mod snapshot;
pub mod sweeper;

use std::sync::Arc;

use crate::policy::PolicyRecord;

pub use memory::{ForgetOutcome, MemoryStore};
pub use snapshot::{load_snapshot, restore, save_snapshot, SnapshotError};
pub use sweeper::ExpirySweeper;

/// Thread-safe HSTS policy storage.
pub trait PolicyStore: Send + Sync {
    /// Whether `host` must currently be reached over TLS.
    fn contains(&self, host: &str) -> bool;

    /// Install, refresh or evict the policy for `record.host`.
    fn add(&self, record: PolicyRecord);
}

impl<T: PolicyStore + ?Sized> PolicyStore for Arc<T> {
    fn contains(&self, host: &str) -> bool {
        (**self).contains(host)
    }

    fn add(&self, record: PolicyRecord) {
        (**self).add(record)
    }
}
