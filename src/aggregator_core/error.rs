//! Error types for the aggregation core

use thiserror::Error;

/// Errors raised while deriving dashboard structures from login events.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("malformed timestamp '{timestamp}': {reason}")]
    MalformedTimestamp { timestamp: String, reason: String },
    #[error("bucket width must be between 1 and 60 minutes, got {0}")]
    InvalidBucketWidth(u32),
}

/// Errors raised while loading login events from a local dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event for employee '{subject_id}' has an empty company")]
    EmptyCategory { subject_id: String },
}
