//! Event dataset loading and JSONL tail reading with rotation detection

use super::error::IngestError;
use super::normalizer::{parse_events, IngestReport};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Leading bytes kept to tell an append from a rewrite of the same file
const HEAD_FINGERPRINT_LEN: u64 = 256;

/// Read a whole dataset (JSON array or JSONL) from disk
pub async fn load_events(path: &Path) -> Result<IngestReport, IngestError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let report = parse_events(&contents)?;

    log::info!(
        "📖 Loaded {} events from {} ({} rejected)",
        report.events.len(),
        path.display(),
        report.rejected.len()
    );
    for rejected in &report.rejected {
        log::warn!("Rejected record #{}: {}", rejected.position, rejected.reason);
    }

    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Replay every line already in the file
    Beginning,
    /// Only lines appended after `start`
    End,
}

/// What a tail read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailLine {
    Line(String),
    /// The file was replaced, truncated or rewritten. Everything delivered
    /// before is stale and lines restart from the top of the new contents.
    Reset,
}

pub struct TailReader {
    path: PathBuf,
    file: Option<BufReader<File>>,
    inode: Option<u64>,
    modified: Option<SystemTime>,
    head: Vec<u8>,
    position: u64,
    pending: String,
    start_position: StartPosition,
    poll_interval: Duration,
}

impl TailReader {
    pub fn new(path: PathBuf, start_position: StartPosition) -> Self {
        Self {
            path,
            file: None,
            inode: None,
            modified: None,
            head: Vec::new(),
            position: 0,
            pending: String::new(),
            start_position,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Open the file at the configured start position
    pub async fn start(&mut self) -> std::io::Result<()> {
        let seek = match self.start_position {
            StartPosition::Beginning => SeekFrom::Start(0),
            StartPosition::End => SeekFrom::End(0),
        };
        self.open(seek).await?;

        log::info!("📖 Started tailing: {}", self.path.display());
        Ok(())
    }

    async fn open(&mut self, seek: SeekFrom) -> std::io::Result<()> {
        let file = File::open(&self.path).await?;
        let metadata = file.metadata().await?;

        #[cfg(unix)]
        {
            self.inode = Some(metadata.ino());
        }
        self.modified = metadata.modified().ok();
        self.head = read_head(&self.path).await?;

        let mut reader = BufReader::new(file);
        self.position = reader.seek(seek).await?;
        self.pending.clear();
        self.file = Some(reader);
        Ok(())
    }

    /// Read the next complete, non-empty line, waiting if necessary.
    ///
    /// Returns `TailLine::Reset` once after the file is replaced or
    /// rewritten, then the new contents from their first line.
    pub async fn read_line(&mut self) -> std::io::Result<TailLine> {
        loop {
            if self.detect_rotation().await? {
                log::info!("🔄 File rotation detected, reopening: {}", self.path.display());
                self.open(SeekFrom::Start(0)).await?;
                return Ok(TailLine::Reset);
            }

            let reader = self.file.as_mut().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "File not opened")
            })?;

            let read = reader.read_line(&mut self.pending).await?;
            if read == 0 {
                sleep(self.poll_interval).await;
                continue;
            }
            self.position += read as u64;

            // Partial line: writer has not finished it yet
            if !self.pending.ends_with('\n') {
                continue;
            }

            let line = self.pending.trim().to_string();
            self.pending.clear();
            if !line.is_empty() {
                return Ok(TailLine::Line(line));
            }
        }
    }

    /// Replaced (inode changed), truncated below our read position, or
    /// rewritten in place (modified and its leading bytes differ)
    async fn detect_rotation(&mut self) -> std::io::Result<bool> {
        if self.file.is_none() {
            return Ok(false);
        }
        let metadata = tokio::fs::metadata(&self.path).await?;

        #[cfg(unix)]
        {
            if self.inode.map_or(false, |old| old != metadata.ino()) {
                return Ok(true);
            }
        }

        if metadata.len() < self.position {
            return Ok(true);
        }

        let modified = metadata.modified().ok();
        if modified.is_none() || modified == self.modified {
            return Ok(false);
        }
        self.modified = modified;

        // Appends leave the head intact; it may only grow up to the fingerprint length
        let head = read_head(&self.path).await?;
        if !head.starts_with(&self.head) {
            return Ok(true);
        }
        self.head = head;
        Ok(false)
    }
}

async fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path).await?;
    let mut head = Vec::new();
    file.take(HEAD_FINGERPRINT_LEN).read_to_end(&mut head).await?;
    Ok(head)
}
