//! Login time trend: fixed-width minute buckets within each hour

use super::error::AggregationError;
use super::normalizer::LoginEvent;
use super::timestamp::{parse_events_timestamps, BucketWidth, ParsedEvent, SkippedEvent};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub bucket_key: String,
    pub count: usize,
}

/// Buckets for one computation cycle plus the events left out of them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeTrend {
    pub buckets: Vec<TimeBucket>,
    pub skipped: Vec<SkippedEvent>,
}

impl TimeTrend {
    /// Number of events counted across all buckets
    pub fn counted(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Tally events into 5-minute buckets
pub fn bucket_by_time(events: &[LoginEvent]) -> TimeTrend {
    tally(events, BucketWidth::default())
}

/// Tally events into buckets of `width_minutes` (1..=60)
pub fn bucket_by_time_with_width(
    events: &[LoginEvent],
    width_minutes: u32,
) -> Result<TimeTrend, AggregationError> {
    let width = BucketWidth::new(width_minutes)?;
    Ok(tally(events, width))
}

/// Buckets are ordered by plain string comparison of their keys, so with
/// unpadded hours `"10:00–04"` comes before `"7:00–04"`.
fn tally(events: &[LoginEvent], width: BucketWidth) -> TimeTrend {
    let (parsed, skipped) = parse_events_timestamps(events);
    TimeTrend {
        buckets: tally_parsed(&parsed, width),
        skipped,
    }
}

pub(crate) fn tally_parsed(parsed: &[ParsedEvent<'_>], width: BucketWidth) -> Vec<TimeBucket> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (_, instant, _) in parsed {
        *counts.entry(width.key_for(instant)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(bucket_key, count)| TimeBucket { bucket_key, count })
        .collect()
}
