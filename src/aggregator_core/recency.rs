//! Most-recent-first view of login events

use super::normalizer::LoginEvent;
use super::timestamp::{parse_events_timestamps, ParsedEvent, SkippedEvent};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentLogins {
    pub events: Vec<LoginEvent>,
    pub skipped: Vec<SkippedEvent>,
}

impl RecentLogins {
    /// Keep only the newest `limit` events
    pub fn limited(mut self, limit: usize) -> Self {
        self.events.truncate(limit);
        self
    }
}

/// Order events newest first.
///
/// Instants are compared as absolute points in time, whatever offset each
/// was written with. Events with the same instant stay in input order.
pub fn order_by_recency(events: &[LoginEvent]) -> RecentLogins {
    let (parsed, skipped) = parse_events_timestamps(events);
    RecentLogins {
        events: newest_first(parsed),
        skipped,
    }
}

pub(crate) fn newest_first(mut parsed: Vec<ParsedEvent<'_>>) -> Vec<LoginEvent> {
    // Stable: equal instants keep their relative input order
    parsed.sort_by(|(_, a, _), (_, b, _)| b.cmp(a));
    parsed.into_iter().map(|(_, _, event)| event.clone()).collect()
}
