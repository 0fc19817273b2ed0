//! One computation cycle's worth of dashboard data

use super::grouping::{group_by_category, CategoryCount};
use super::normalizer::LoginEvent;
use super::recency::{newest_first, RecentLogins};
use super::stats::SummaryStats;
use super::timestamp::{parse_events_timestamps, BucketWidth, SkippedEvent};
use super::window::{tally_parsed, TimeTrend};
use serde::Serialize;

/// Options that shape a snapshot without changing aggregation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOptions {
    pub bucket_width: BucketWidth,
    /// Cap on the recency view; `None` keeps every event
    pub recent_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: SummaryStats,
    pub by_category: Vec<CategoryCount>,
    pub time_trend: TimeTrend,
    pub recent: RecentLogins,
}

impl DashboardSnapshot {
    /// Derive every dashboard structure from `events`.
    ///
    /// Timestamps are parsed once and shared by the trend and recency views;
    /// nothing is cached between calls.
    pub fn compute(events: &[LoginEvent], options: SnapshotOptions) -> Self {
        let by_category = group_by_category(events);
        let stats = SummaryStats::from_counts(events, &by_category);

        let (parsed, skipped) = parse_events_timestamps(events);
        let time_trend = TimeTrend {
            buckets: tally_parsed(&parsed, options.bucket_width),
            skipped: skipped.clone(),
        };

        let mut recent = RecentLogins {
            events: newest_first(parsed),
            skipped,
        };
        if let Some(limit) = options.recent_limit {
            recent = recent.limited(limit);
        }

        log::debug!(
            "Computed snapshot: {} events, {} companies, {} buckets, {} skipped",
            stats.total_count,
            stats.unique_category_count,
            time_trend.buckets.len(),
            time_trend.skipped.len()
        );

        Self {
            stats,
            by_category,
            time_trend,
            recent,
        }
    }

    /// Events left out of the time-based views.
    ///
    /// Both views parse the same timestamps, so the trend's list covers them.
    pub fn skipped(&self) -> &[SkippedEvent] {
        &self.time_trend.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn sample() -> Vec<LoginEvent> {
        vec![
            LoginEvent::new("0999", "67217", "July 8, 2025 at 7:03:02 AM UTC+7"),
            LoginEvent::new("1234", "80001", "July 8, 2025 at 7:06:10 AM UTC+7"),
            LoginEvent::new("1234", "80002", "July 8, 2025 at 7:07:28 AM UTC+7"),
            LoginEvent::new("5678", "90001", "broken"),
        ]
    }

    #[test]
    fn test_compute_snapshot() {
        let snapshot = DashboardSnapshot::compute(&sample(), SnapshotOptions::default());

        assert_eq!(snapshot.stats.total_count, 4);
        assert_eq!(snapshot.stats.unique_category_count, 3);
        assert_eq!(snapshot.by_category[0].category, "1234");
        assert_eq!(snapshot.time_trend.counted(), 3);
        assert_eq!(snapshot.recent.events[0].subject_id, "80002");
        assert_eq!(snapshot.skipped().len(), 1);
        assert_eq!(snapshot.recent.skipped, snapshot.time_trend.skipped);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let events = sample();
        let options = SnapshotOptions {
            bucket_width: BucketWidth::default(),
            recent_limit: Some(2),
        };
        let first = DashboardSnapshot::compute(&events, options);
        let second = DashboardSnapshot::compute(&events, options);

        assert_eq!(first, second);
        assert_eq!(first.recent.events.len(), 2);
    }

    struct WarningLog;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_malformed_timestamp_warned_once_per_compute() {
        // Only test in this binary that installs a logger
        log::set_logger(&WarningLog).unwrap();
        log::set_max_level(log::LevelFilter::Warn);

        let events = vec![
            LoginEvent::new("0999", "67217", "July 8, 2025 at 7:03:02 AM UTC+7"),
            LoginEvent::new("5678", "warn-once-31337", "not a time"),
        ];
        let snapshot = DashboardSnapshot::compute(&events, SnapshotOptions::default());
        assert_eq!(snapshot.skipped().len(), 1);
        assert_eq!(snapshot.recent.skipped.len(), 1);

        let warnings = WARNINGS
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.contains("warn-once-31337"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DashboardSnapshot::compute(&[], SnapshotOptions::default());
        assert!(snapshot.by_category.is_empty());
        assert!(snapshot.time_trend.buckets.is_empty());
        assert!(snapshot.recent.events.is_empty());
        assert_eq!(snapshot.stats.average_per_category, None);
    }
}
