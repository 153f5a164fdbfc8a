// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-writer sequence numbers.
//!
//! Each DataSetWriter counts independently: `next = (last + 1) mod 2^width`.
//! A writer starts at 0, so its first message carries 1. The counter only
//! moves when the caller commits a successful publish.

use std::collections::HashMap;

/// Largest supported counter width in bits.
pub const MAX_SEQUENCE_WIDTH: u8 = 32;

/// Per-writer sequence counters.
#[derive(Debug, Clone)]
pub struct SequenceTracker {
    width: u8,
    last: HashMap<u32, u32>,
}

impl SequenceTracker {
    /// Create a tracker with a `width`-bit counter per writer.
    ///
    /// Returns `None` unless `1 <= width <= 32`.
    pub fn new(width: u8) -> Option<Self> {
        (1..=MAX_SEQUENCE_WIDTH).contains(&width).then(|| Self {
            width,
            last: HashMap::new(),
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Last committed sequence number of a writer (0 before its first publish).
    pub fn last(&self, writer_id: u32) -> u32 {
        self.last.get(&writer_id).copied().unwrap_or(0)
    }

    /// Sequence number the writer's next message should carry.
    pub fn peek_next(&self, writer_id: u32) -> u32 {
        let modulus = 1u64 << self.width;
        ((u64::from(self.last(writer_id)) + 1) % modulus) as u32
    }

    /// Record that `sequence_number` was published for the writer.
    pub fn commit(&mut self, writer_id: u32, sequence_number: u32) {
        self.last.insert(writer_id, sequence_number);
    }

    /// Forget a writer's counter.
    pub fn reset(&mut self, writer_id: u32) {
        self.last.remove(&writer_id);
    }

    /// Number of writers that have published at least once.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self {
            width: 16,
            last: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_bounds() {
        assert!(SequenceTracker::new(0).is_none());
        assert!(SequenceTracker::new(33).is_none());
        assert_eq!(SequenceTracker::new(32).map(|t| t.width()), Some(32));
    }

    #[test]
    fn test_first_message_is_one() {
        let tracker = SequenceTracker::default();
        assert_eq!(tracker.last(1000), 0);
        assert_eq!(tracker.peek_next(1000), 1);
    }

    #[test]
    fn test_wraps_at_width() {
        let mut tracker = SequenceTracker::new(16).unwrap();
        tracker.commit(1, u32::from(u16::MAX));
        assert_eq!(tracker.peek_next(1), 0);

        let mut tracker = SequenceTracker::new(32).unwrap();
        tracker.commit(1, u32::MAX);
        assert_eq!(tracker.peek_next(1), 0);

        let mut tracker = SequenceTracker::new(2).unwrap();
        tracker.commit(1, 3);
        assert_eq!(tracker.peek_next(1), 0);
    }

    #[test]
    fn test_writers_are_independent() {
        let mut tracker = SequenceTracker::default();
        tracker.commit(1, 5);
        assert_eq!(tracker.peek_next(1), 6);
        assert_eq!(tracker.peek_next(2), 1);
        tracker.reset(1);
        assert_eq!(tracker.peek_next(1), 1);
        assert!(tracker.is_empty());
    }
}
