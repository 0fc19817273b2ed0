//! Event list accumulated from a tailed dataset
//!
//! Watch mode feeds every `TailLine` through here and recomputes from
//! `events()` when `take_dirty` says the input changed.

use super::normalizer::LoginEvent;
use super::reader::TailLine;

#[derive(Debug, Default)]
pub struct LiveDataset {
    events: Vec<LoginEvent>,
    rejected: usize,
    resets: usize,
    dirty: bool,
}

impl LiveDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one tail result. A reset drops everything accumulated so far,
    /// since the reader replays the new contents from the top.
    pub fn apply(&mut self, line: TailLine) {
        match line {
            TailLine::Line(line) => match LoginEvent::from_jsonl(&line) {
                Ok(event) => {
                    self.events.push(event);
                    self.dirty = true;
                }
                Err(e) => {
                    log::warn!("Failed to parse login event: {} ({})", line, e);
                    self.rejected += 1;
                }
            },
            TailLine::Reset => {
                log::info!(
                    "Dataset replaced, discarding {} accumulated events",
                    self.events.len()
                );
                self.events.clear();
                self.rejected = 0;
                self.resets += 1;
                self.dirty = true;
            }
        }
    }

    pub fn events(&self) -> &[LoginEvent] {
        &self.events
    }

    /// Lines of the current dataset that failed to decode
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    /// True if events changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
