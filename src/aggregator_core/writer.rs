//! Unified writer interface for dashboard snapshots
//!
//! Routes writes to stdout or an appended JSONL file based on configuration.

use super::jsonl_writer::SnapshotJsonlWriter;
use super::snapshot::DashboardSnapshot;
use super::writer_backend::{SnapshotRecord, SnapshotWriterBackend, SnapshotWriterError};
use crate::config::BackendType;
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;

/// Pretty-prints each snapshot to stdout
pub struct StdoutSnapshotWriter;

#[async_trait]
impl SnapshotWriterBackend for StdoutSnapshotWriter {
    async fn write_snapshot(&mut self, record: &SnapshotRecord<'_>) -> Result<(), SnapshotWriterError> {
        let json = serde_json::to_string_pretty(record)?;
        {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SnapshotWriterError> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "stdout"
    }
}

/// Unified writer that routes to either the stdout or JSONL backend
pub enum SnapshotWriter {
    Stdout(StdoutSnapshotWriter),
    Jsonl(SnapshotJsonlWriter),
}

impl SnapshotWriter {
    /// Create a new snapshot writer based on backend type
    pub fn new(backend: BackendType, output_path: PathBuf) -> Result<Self, SnapshotWriterError> {
        match backend {
            BackendType::Stdout => Ok(SnapshotWriter::Stdout(StdoutSnapshotWriter)),
            BackendType::Jsonl => {
                let writer = SnapshotJsonlWriter::new(output_path)?;
                Ok(SnapshotWriter::Jsonl(writer))
            }
        }
    }

    /// Stamp and write a snapshot to the configured backend
    pub async fn write(&mut self, computed_at: i64, snapshot: &DashboardSnapshot) -> Result<(), SnapshotWriterError> {
        let record = SnapshotRecord { computed_at, snapshot };
        match self {
            SnapshotWriter::Stdout(w) => w.write_snapshot(&record).await,
            SnapshotWriter::Jsonl(w) => SnapshotWriterBackend::write_snapshot(w, &record).await,
        }
    }

    /// Flush pending writes
    pub async fn flush(&mut self) -> Result<(), SnapshotWriterError> {
        match self {
            SnapshotWriter::Stdout(w) => w.flush().await,
            SnapshotWriter::Jsonl(w) => SnapshotWriterBackend::flush(w).await,
        }
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            SnapshotWriter::Stdout(w) => w.backend_type(),
            SnapshotWriter::Jsonl(w) => w.backend_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::snapshot::SnapshotOptions;

    #[tokio::test]
    async fn test_routes_to_jsonl_backend() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snapshots.jsonl");

        let mut writer = SnapshotWriter::new(BackendType::Jsonl, path.clone()).unwrap();
        assert_eq!(writer.backend_type(), "JSONL");

        let snapshot = DashboardSnapshot::compute(&[], SnapshotOptions::default());
        writer.write(1_751_932_982, &snapshot).await.unwrap();
        writer.flush().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"computed_at\":1751932982"));
        assert!(contents.contains("\"average_per_category\":null"));
    }

    #[test]
    fn test_stdout_backend_needs_no_path() {
        let writer = SnapshotWriter::new(BackendType::Stdout, PathBuf::new()).unwrap();
        assert_eq!(writer.backend_type(), "stdout");
    }
}
