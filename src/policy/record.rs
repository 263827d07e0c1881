//! Per-host HSTS policy record.
//!
//! # Responsibilities
//! - Describe one host's rule (host, subdomain inclusion, permanence, lifetime)
//! - Decide whether the rule covers a requested host at a given instant
//!
//! # Design Decisions
//! - Host matching is a plain, case-sensitive suffix test; ports are part of the host
//! - Expiry boundary is inclusive: `created + max_age` is still valid
//! - The current time is passed in, never read from a global

use serde::{Deserialize, Serialize};

/// The HSTS rule for a single host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Exact host this record governs (may include a port).
    pub host: String,

    /// Also govern hosts that have `host` as a suffix.
    pub include_subdomains: bool,

    /// Never expires regardless of `created`/`max_age`.
    pub permanent: bool,

    /// Unix timestamp (seconds) when the record was installed or refreshed.
    pub created: i64,

    /// Lifetime in seconds, counted from `created`.
    pub max_age: i64,
}

impl PolicyRecord {
    /// A record learned from a response header at time `now`.
    pub fn learned(
        host: impl Into<String>,
        include_subdomains: bool,
        max_age: i64,
        now: i64,
    ) -> Self {
        Self {
            host: host.into(),
            include_subdomains,
            permanent: false,
            created: now,
            max_age,
        }
    }

    /// A permanent record, as installed for operator-pinned hosts.
    pub fn pinned(host: impl Into<String>, include_subdomains: bool) -> Self {
        Self {
            host: host.into(),
            include_subdomains,
            permanent: true,
            created: 0,
            max_age: 0,
        }
    }

    /// True for the "no longer in force" sentinel: zero max-age, not permanent.
    /// Such a record is an eviction request and is never stored.
    pub fn is_eviction(&self) -> bool {
        self.max_age == 0 && !self.permanent
    }

    /// Unix timestamp after which the record stops applying.
    pub fn expires_at(&self) -> i64 {
        self.created.saturating_add(self.max_age)
    }

    /// True if a non-permanent record has outlived its max-age at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        !self.permanent && now > self.expires_at()
    }

    /// Returns whether `requested_host` must use TLS according to this record.
    pub fn applies(&self, requested_host: &str, now: i64) -> bool {
        if !requested_host.ends_with(self.host.as_str()) {
            return false;
        }

        if requested_host != self.host && !self.include_subdomains {
            // proper suffix, but the rule covers the exact host only
            return false;
        }

        !self.is_expired(now)
    }
}
