//! Aggregator Core - login event derivations for the dashboard
//!
//! Three independent, pure transforms over one slice of login events, plus
//! the scalar statistics and the I/O edges that feed and drain them.
//!
//! # Architecture
//!
//! ```text
//! events file (JSON array / JSONL) → load_events / TailReader → LiveDataset
//!     ↓
//! &[LoginEvent]
//!     ├─ group_by_category  → Vec<CategoryCount>   (count desc, first-seen on ties)
//!     ├─ bucket_by_time     → TimeTrend            (5-minute buckets, key asc)
//!     └─ order_by_recency   → RecentLogins         (newest first, stable)
//!     ↓
//! DashboardSnapshot (+ SummaryStats)
//!     ↓
//! SnapshotWriter → stdout or JSONL backend
//! ```
//!
//! Events whose timestamp cannot be parsed are left out of the time-based
//! views and reported as `SkippedEvent`s alongside them.

pub mod error;
pub mod grouping;
pub mod live_dataset;
pub mod normalizer;
pub mod reader;
pub mod recency;
pub mod snapshot;
pub mod stats;
pub mod timestamp;
pub mod window;
pub mod writer_backend;
pub mod jsonl_writer;
pub mod writer;

pub use error::{AggregationError, IngestError};
pub use grouping::{category_share, group_by_category, CategoryCount};
pub use live_dataset::LiveDataset;
pub use normalizer::{parse_events, IngestReport, LoginEvent, RejectedRecord};
pub use reader::{load_events, StartPosition, TailLine, TailReader};
pub use recency::{order_by_recency, RecentLogins};
pub use snapshot::{DashboardSnapshot, SnapshotOptions};
pub use stats::SummaryStats;
pub use timestamp::{bucket_key, parse_timestamp, BucketWidth, SkippedEvent};
pub use window::{bucket_by_time, bucket_by_time_with_width, TimeBucket, TimeTrend};
pub use writer_backend::{SnapshotRecord, SnapshotWriterBackend, SnapshotWriterError};
pub use jsonl_writer::SnapshotJsonlWriter;
pub use writer::{SnapshotWriter, StdoutSnapshotWriter};
