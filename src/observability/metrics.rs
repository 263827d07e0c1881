//! Policy engine metrics.
//!
//! # Metrics
//! - `hsts_upgrades_total` (counter): plain requests answered with a synthetic redirect
//! - `hsts_policies_learned_total` (counter): records installed from response headers,
//!   labelled by `include_subdomains`
//! - `hsts_policies_evicted_total` (counter): records removed by a zero max-age header
//! - `hsts_policies_purged_total` (counter): expired records dropped by a purge
//! - `hsts_store_entries` (gauge): records currently held by the store
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed recorder it is a no-op
//! - No host labels, to keep cardinality bounded

/// Record a plain request upgraded by a synthetic redirect.
pub fn record_upgrade() {
    metrics::counter!("hsts_upgrades_total").increment(1);
}

/// Record a policy learned from a secure response.
pub fn record_policy_learned(include_subdomains: bool) {
    metrics::counter!(
        "hsts_policies_learned_total",
        "include_subdomains" => include_subdomains.to_string()
    )
    .increment(1);
}

/// Record an eviction triggered by a zero max-age.
pub fn record_policy_evicted() {
    metrics::counter!("hsts_policies_evicted_total").increment(1);
}

/// Record expired records dropped by a purge.
pub fn record_policies_purged(count: usize) {
    metrics::counter!("hsts_policies_purged_total").increment(count as u64);
}

/// Update the store size gauge.
pub fn record_store_size(size: usize) {
    metrics::gauge!("hsts_store_entries").set(size as f64);
}
