//! Timestamp parsing and bucket-key helpers shared by the time-based transforms

use super::error::AggregationError;
use super::normalizer::LoginEvent;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike};
use serde::Serialize;

/// Console export layout, e.g. `July 8, 2025 at 7:03:02 AM` (zone suffix handled separately)
const CONSOLE_LAYOUT: &str = "%B %d, %Y at %I:%M:%S %p";

pub const DEFAULT_BUCKET_WIDTH_MINUTES: u32 = 5;

/// Parse an event timestamp, keeping the offset it was written with.
///
/// Accepted layouts:
/// - console export: `July 8, 2025 at 7:03:02 AM UTC+7` (`UTC`, `UTC-5`, `UTC+05:30` all valid)
/// - RFC 3339: `2025-07-08T07:03:02+07:00`
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, AggregationError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    let (local, zone) = trimmed
        .rsplit_once(" UTC")
        .ok_or_else(|| malformed(raw, "missing UTC offset suffix"))?;

    let offset = parse_utc_offset(zone)
        .ok_or_else(|| malformed(raw, &format!("invalid UTC offset '{}'", zone)))?;

    let naive = NaiveDateTime::parse_from_str(local.trim(), CONSOLE_LAYOUT)
        .map_err(|e| malformed(raw, &e.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| malformed(raw, "ambiguous local time"))
}

/// Parse the part after `UTC`: empty, `+7`, `-5`, `+05:30`
fn parse_utc_offset(zone: &str) -> Option<FixedOffset> {
    if zone.is_empty() {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = if let Some(rest) = zone.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = zone.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };

    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    if !is_short_number(hours) || !is_short_number(minutes) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn is_short_number(s: &str) -> bool {
    !s.is_empty() && s.len() <= 2 && s.chars().all(|c| c.is_ascii_digit())
}

fn malformed(raw: &str, reason: &str) -> AggregationError {
    AggregationError::MalformedTimestamp {
        timestamp: raw.to_string(),
        reason: reason.to_string(),
    }
}

/// An event a time-based transform had to leave out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEvent {
    /// Position of the event in the input slice
    pub index: usize,
    pub subject_id: String,
    pub timestamp: String,
    pub reason: String,
}

/// An event with a usable timestamp and its input position
pub(crate) type ParsedEvent<'a> = (usize, DateTime<FixedOffset>, &'a LoginEvent);

/// Parse every event's timestamp, splitting the input into usable events
/// (with their input position) and skipped ones.
pub(crate) fn parse_events_timestamps(
    events: &[LoginEvent],
) -> (Vec<ParsedEvent<'_>>, Vec<SkippedEvent>) {
    let mut parsed = Vec::with_capacity(events.len());
    let mut skipped = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match parse_timestamp(&event.timestamp) {
            Ok(instant) => parsed.push((index, instant, event)),
            Err(e) => {
                log::warn!(
                    "Skipping event #{} (employee {}): {}",
                    index,
                    event.subject_id,
                    e
                );
                skipped.push(SkippedEvent {
                    index,
                    subject_id: event.subject_id.clone(),
                    timestamp: event.timestamp.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (parsed, skipped)
}

/// Width of a login-trend bucket in minutes, always within `1..=60`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketWidth(u32);

impl BucketWidth {
    pub fn new(minutes: u32) -> Result<Self, AggregationError> {
        if (1..=60).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(AggregationError::InvalidBucketWidth(minutes))
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// First minute of the bucket containing `minute`
    pub fn start_of(&self, minute: u32) -> u32 {
        (minute / self.0) * self.0
    }

    /// Last minute of the bucket starting at `start`; never wraps past :59
    pub fn end_of(&self, start: u32) -> u32 {
        (start + self.0 - 1).min(59)
    }

    /// Bucket key for an instant, read in the instant's own offset
    pub fn key_for(&self, instant: &DateTime<FixedOffset>) -> String {
        let start = self.start_of(instant.minute());
        bucket_key(instant.hour(), start, self.end_of(start))
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self(DEFAULT_BUCKET_WIDTH_MINUTES)
    }
}

/// `<hour>:<start>–<end>`; the hour is not zero-padded
pub fn bucket_key(hour: u32, start: u32, end: u32) -> String {
    format!("{}:{:02}\u{2013}{:02}", hour, start, end)
}
