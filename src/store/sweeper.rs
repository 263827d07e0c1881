//! Periodic purge of expired policy.
//!
//! # Responsibilities
//! - Periodically drop records past their max-age
//! - Exit promptly on the shutdown signal
//!
//! # Design Decisions
//! - Purely a memory bound: lookups already ignore expired records
//! - Permanent records are never touched

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::store::MemoryStore;

pub struct ExpirySweeper {
    store: Arc<MemoryStore>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<MemoryStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if self.interval.is_zero() {
            tracing::info!("HSTS expiry sweeper disabled");
            return;
        }

        tracing::info!(interval = ?self.interval, "HSTS expiry sweeper starting");

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.store.purge_expired();
                    if purged > 0 {
                        tracing::info!(
                            purged,
                            remaining = self.store.len(),
                            "Purged expired HSTS policies"
                        );
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("HSTS expiry sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
