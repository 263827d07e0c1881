//! In-memory policy store.
//!
//! # Responsibilities
//! - Map exact hosts to their PolicyRecord
//! - Answer enforcement queries with the hierarchical parent walk
//! - Apply the add/evict precedence rules atomically

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;
use crate::policy::{Clock, PolicyRecord, SystemClock};
use crate::store::PolicyStore;

/// What [`MemoryStore::forget`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgetOutcome {
    Removed,
    /// Permanent records are kept.
    Pinned,
    NoPolicy,
}

/// Mutex-guarded host → record map.
#[derive(Debug)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, PolicyRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// The clock expiry is evaluated against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PolicyRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a permanent record for `host`.
    pub fn pin(&self, host: impl Into<String>, include_subdomains: bool) {
        self.add(PolicyRecord::pinned(host, include_subdomains));
    }

    /// The record stored under exactly `host`, if any, expired or not.
    pub fn get(&self, host: &str) -> Option<PolicyRecord> {
        self.lock().get(host).cloned()
    }

    /// Evict the learned record stored under exactly `host`.
    pub fn forget(&self, host: &str) -> ForgetOutcome {
        match self.get(host) {
            None => ForgetOutcome::NoPolicy,
            Some(record) if record.permanent => ForgetOutcome::Pinned,
            Some(_) => {
                self.add(PolicyRecord::learned(host, false, 0, self.clock.now()));
                ForgetOutcome::Removed
            }
        }
    }

    /// Copy of every stored record, sorted by host.
    pub fn records(&self) -> Vec<PolicyRecord> {
        let mut records: Vec<_> = self.lock().values().cloned().collect();
        records.sort_by(|a, b| a.host.cmp(&b.host));
        records
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every non-permanent record past its max-age. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.lock();
        let before = records.len();

        records.retain(|host, record| {
            let keep = !record.is_expired(now);
            if !keep {
                tracing::debug!(
                    host = %host,
                    expired_at = record.expires_at(),
                    "Purging expired HSTS policy"
                );
            }
            keep
        });

        let purged = before - records.len();
        metrics::record_store_size(records.len());
        if purged > 0 {
            metrics::record_policies_purged(purged);
        }
        purged
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for MemoryStore {
    fn contains(&self, host: &str) -> bool {
        let now = self.clock.now();
        let records = self.lock();

        if let Some(record) = records.get(host) {
            return record.applies(host, now);
        }

        // walk up: a.b.example.com → b.example.com → example.com → com
        let mut parent = host;
        while let Some(i) = parent.find('.').filter(|&i| i > 0) {
            parent = &parent[i + 1..];
            if let Some(record) = records.get(parent) {
                return record.applies(host, now);
            }
        }

        false
    }

    fn add(&self, record: PolicyRecord) {
        let mut records = self.lock();

        if record.is_eviction() {
            match records.get(&record.host) {
                Some(existing) if existing.permanent => {
                    tracing::warn!(
                        host = %record.host,
                        "Ignoring HSTS eviction of permanent policy"
                    );
                }
                Some(_) => {
                    records.remove(&record.host);
                    tracing::info!(host = %record.host, "Evicted HSTS policy");
                    metrics::record_policy_evicted();
                }
                None => {}
            }
        } else {
            tracing::debug!(
                host = %record.host,
                include_subdomains = record.include_subdomains,
                permanent = record.permanent,
                max_age = record.max_age,
                "Stored HSTS policy"
            );
            records.insert(record.host.clone(), record);
        }

        metrics::record_store_size(records.len());
    }
}
