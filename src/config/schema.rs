//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML and every
//! field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::policy::DEFAULT_FALLBACK_MAX_AGE;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HstsConfig {
    /// Policy learning and pinned hosts.
    pub policy: PolicyConfig,

    /// Snapshot persistence and expiry sweeping.
    pub storage: StorageConfig,

    /// Network executor settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Max-age (seconds) applied when a Strict-Transport-Security header has no
    /// parseable `max-age` directive.
    pub fallback_max_age_secs: i64,

    /// Hosts installed as permanent records at startup.
    pub pinned: Vec<PinnedHost>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            fallback_max_age_secs: DEFAULT_FALLBACK_MAX_AGE,
            pinned: Vec::new(),
        }
    }
}

/// An operator-pinned host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinnedHost {
    /// Exact host, optionally with `:port`.
    pub host: String,

    /// Also cover every subdomain.
    #[serde(default)]
    pub include_subdomains: bool,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot restored at startup and written back after changes.
    pub snapshot_path: Option<PathBuf>,

    /// Expiry sweep interval in seconds (0 disables the sweeper).
    pub sweep_interval_secs: u64,
}

/// Upstream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            pool_idle_timeout_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
