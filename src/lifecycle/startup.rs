//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the policy store from configuration and snapshot
//! - Start the expiry sweeper when configured
//! - Hand out enforcing clients sharing the one store
//! - Persist policy on shutdown

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, HstsConfig};
use crate::policy::{Clock, SystemClock};
use crate::store::{
    load_snapshot, restore, save_snapshot, ExpirySweeper, MemoryStore, SnapshotError,
};
use crate::transport::{HstsLayer, HstsService, UpstreamClient};

/// Error raised while bringing the policy engine up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Build a store: snapshot records first, then configured pins.
pub fn init_store(
    config: &HstsConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<MemoryStore>, StartupError> {
    let store = Arc::new(MemoryStore::with_clock(clock));

    if let Some(path) = &config.storage.snapshot_path {
        restore(&*store, load_snapshot(path)?);
    }

    for pinned in &config.policy.pinned {
        store.pin(pinned.host.clone(), pinned.include_subdomains);
    }

    tracing::info!(
        entries = store.len(),
        pinned = config.policy.pinned.len(),
        "HSTS policy store initialized"
    );
    Ok(store)
}

/// A running policy engine: store, optional sweeper, persistence.
pub struct HstsRuntime {
    config: HstsConfig,
    store: Arc<MemoryStore>,
    shutdown_tx: broadcast::Sender<()>,
    sweeper: Option<JoinHandle<()>>,
}

impl HstsRuntime {
    /// Start with the system clock. Spawning the sweeper requires a Tokio runtime.
    pub fn start(config: HstsConfig) -> Result<Self, StartupError> {
        Self::start_with_clock(config, Arc::new(SystemClock))
    }

    pub fn start_with_clock(
        config: HstsConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StartupError> {
        let store = init_store(&config, clock)?;
        let (shutdown_tx, _) = broadcast::channel(1);

        let sweeper = match config.storage.sweep_interval_secs {
            0 => None,
            secs => {
                let sweeper = ExpirySweeper::new(store.clone(), Duration::from_secs(secs));
                Some(tokio::spawn(sweeper.run(shutdown_tx.subscribe())))
            }
        };

        Ok(Self {
            config,
            store,
            shutdown_tx,
            sweeper,
        })
    }

    pub fn config(&self) -> &HstsConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Enforcement layer bound to this runtime's store and settings.
    pub fn layer(&self) -> HstsLayer<MemoryStore> {
        HstsLayer::new(self.store.clone())
            .with_clock(self.store.clock().clone())
            .with_fallback_max_age(self.config.policy.fallback_max_age_secs)
    }

    /// Network client wrapped in the enforcement layer.
    pub fn client(&self) -> HstsService<UpstreamClient, MemoryStore> {
        tower::Layer::layer(&self.layer(), UpstreamClient::new(&self.config.upstream))
    }

    /// Write the snapshot, if one is configured. Returns the number of records written.
    pub fn persist(&self) -> Result<usize, SnapshotError> {
        match &self.config.storage.snapshot_path {
            Some(path) => save_snapshot(&self.store, path),
            None => Ok(0),
        }
    }

    /// Stop the sweeper and persist the store.
    pub async fn shutdown(mut self) -> Result<(), SnapshotError> {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.sweeper.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "HSTS expiry sweeper task failed");
            }
        }

        self.persist()?;
        tracing::info!("HSTS runtime stopped");
        Ok(())
    }
}
