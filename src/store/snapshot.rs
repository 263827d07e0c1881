//! Policy snapshot persistence.
//!
//! Records are written as a JSON array. Restoring replays every record through
//! `add`, so eviction sentinels never become stored entries.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

use thiserror::Error;

use crate::policy::PolicyRecord;
use crate::store::{MemoryStore, PolicyStore};

/// Error type for snapshot load/save.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write every record held by `store` to `path`.
pub fn save_snapshot(store: &MemoryStore, path: &Path) -> Result<usize, SnapshotError> {
    let records = store.records();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &records)?;

    tracing::info!(path = %path.display(), count = records.len(), "Saved HSTS snapshot");
    Ok(records.len())
}

/// Read records from `path`. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> Result<Vec<PolicyRecord>, SnapshotError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No HSTS snapshot found");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let records: Vec<PolicyRecord> = serde_json::from_reader(BufReader::new(file))?;
    tracing::info!(path = %path.display(), count = records.len(), "Loaded HSTS snapshot");
    Ok(records)
}

/// Replay `records` into `store`.
pub fn restore(store: &impl PolicyStore, records: Vec<PolicyRecord>) {
    for record in records {
        store.add(record);
    }
}
