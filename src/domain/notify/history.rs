//! Bounded event history.

use std::collections::VecDeque;

use super::Event;

/// Default number of events retained for catch-up reads.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Fixed-capacity sliding window over the most recent events.
///
/// Append-only: pushing beyond capacity evicts the oldest entry. Pure and
/// synchronous; the broadcaster serializes access around it.
#[derive(Debug)]
pub struct HistoryBuffer {
    events: VecDeque<Event>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates a buffer holding at most `capacity` events.
    ///
    /// A zero capacity is bumped to one so `push` always retains the newest
    /// event.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an event, evicting the oldest when full.
    pub fn push(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Returns the last `min(limit, len)` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<Event> {
        let take = limit.min(self.events.len());
        let skip = self.events.len() - take;
        self.events.iter().skip(skip).cloned().collect()
    }

    /// Number of events currently retained.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the buffer holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The configured window size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
