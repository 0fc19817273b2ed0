//! Dashboard configuration from environment variables

use crate::aggregator_core::{BucketWidth, SnapshotOptions};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendType {
    Stdout,
    Jsonl,
}

impl BackendType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stdout" => Some(BackendType::Stdout),
            "jsonl" => Some(BackendType::Jsonl),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration for the dashboard binary
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Local dataset of login events (JSON array or JSONL)
    pub events_path: PathBuf,

    /// Destination for the JSONL backend
    pub output_path: PathBuf,

    pub bucket_width: BucketWidth,

    /// Cap on the recency view, unlimited when unset
    pub recent_limit: Option<usize>,

    /// Watch mode: how often a changed dataset is re-aggregated
    pub emission_interval: Duration,

    pub rust_log: Option<String>,
}

impl DashboardConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `EVENTS_PATH` (default: demos/sample_events.jsonl)
    /// - `OUTPUT_PATH` (default: streams/dashboard/snapshots.jsonl)
    /// - `BUCKET_WIDTH_MINUTES` (default: 5, must be 1..=60)
    /// - `RECENT_LIMIT` (default: unlimited)
    /// - `EMISSION_INTERVAL_SECS` (default: 5)
    /// - `RUST_LOG` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_minutes = parse_var(&lookup, "BUCKET_WIDTH_MINUTES")?
            .unwrap_or(crate::aggregator_core::timestamp::DEFAULT_BUCKET_WIDTH_MINUTES);
        let bucket_width = BucketWidth::new(bucket_minutes)
            .map_err(|e| ConfigError::InvalidValue(format!("BUCKET_WIDTH_MINUTES: {}", e)))?;

        let emission_secs: u64 = parse_var(&lookup, "EMISSION_INTERVAL_SECS")?.unwrap_or(5);
        if emission_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "EMISSION_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            events_path: lookup("EVENTS_PATH")
                .unwrap_or_else(|| "demos/sample_events.jsonl".to_string())
                .into(),
            output_path: lookup("OUTPUT_PATH")
                .unwrap_or_else(|| "streams/dashboard/snapshots.jsonl".to_string())
                .into(),
            bucket_width,
            recent_limit: parse_var(&lookup, "RECENT_LIMIT")?,
            emission_interval: Duration::from_secs(emission_secs),
            rust_log: lookup("RUST_LOG"),
        })
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            bucket_width: self.bucket_width,
            recent_limit: self.recent_limit,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, raw))),
    }
}
