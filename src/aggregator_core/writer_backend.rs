//! Writer backend trait for dashboard snapshots
//!
//! Defines the interface for handing computed snapshots to a presentation layer.

use async_trait::async_trait;
use super::snapshot::DashboardSnapshot;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotWriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A snapshot stamped with the time it was computed
#[derive(Debug, Serialize)]
pub struct SnapshotRecord<'a> {
    pub computed_at: i64,
    pub snapshot: &'a DashboardSnapshot,
}

/// Backend trait for writing dashboard snapshots
#[async_trait]
pub trait SnapshotWriterBackend: Send {
    /// Write a single snapshot record
    async fn write_snapshot(&mut self, record: &SnapshotRecord<'_>) -> Result<(), SnapshotWriterError>;

    /// Flush pending writes
    async fn flush(&mut self) -> Result<(), SnapshotWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
