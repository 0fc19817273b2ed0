//! JSONL writer for dashboard snapshots - one record per computation cycle

use super::writer_backend::{SnapshotRecord, SnapshotWriterBackend, SnapshotWriterError};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct SnapshotJsonlWriter {
    path: PathBuf,
    writer: BufWriter<std::fs::File>,
}

impl SnapshotJsonlWriter {
    pub fn new(path: PathBuf) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        log::info!("📝 Writing dashboard snapshots to: {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_snapshot(&mut self, record: &SnapshotRecord<'_>) -> Result<(), SnapshotWriterError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        // Snapshots are infrequent; readers should see each one as soon as it lands
        self.writer.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for SnapshotJsonlWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[async_trait]
impl SnapshotWriterBackend for SnapshotJsonlWriter {
    async fn write_snapshot(&mut self, record: &SnapshotRecord<'_>) -> Result<(), SnapshotWriterError> {
        SnapshotJsonlWriter::write_snapshot(self, record)
    }

    async fn flush(&mut self) -> Result<(), SnapshotWriterError> {
        SnapshotJsonlWriter::flush(self)?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::normalizer::LoginEvent;
    use crate::aggregator_core::snapshot::{DashboardSnapshot, SnapshotOptions};

    #[test]
    fn test_appends_one_line_per_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("snapshots.jsonl");

        let events = vec![LoginEvent::new("0999", "67217", "July 8, 2025 at 7:03:02 AM UTC+7")];
        let snapshot = DashboardSnapshot::compute(&events, SnapshotOptions::default());

        let mut writer = SnapshotJsonlWriter::new(path.clone()).unwrap();
        for computed_at in [1, 2] {
            writer
                .write_snapshot(&SnapshotRecord {
                    computed_at,
                    snapshot: &snapshot,
                })
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let record: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(record["computed_at"], 2);
        assert_eq!(record["snapshot"]["stats"]["total_count"], 1);
        assert_eq!(record["snapshot"]["time_trend"]["buckets"][0]["bucket_key"], "7:00–04");
        assert_eq!(record["snapshot"]["recent"]["events"][0]["employeeNo"], "67217");
    }
}
