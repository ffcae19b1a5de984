//! Sequence-based time
//!
//! The lifecycle never reads a wall clock. Time is the ledger's sequence
//! number, threaded explicitly through every call:
//! - `Sequence` - Logical time unit
//! - `SequenceSource` - Where the current sequence comes from
//! - `LedgerClock` - In-process, manually advanced source

use std::sync::atomic::{AtomicU64, Ordering};

/// A ledger sequence number (logical time unit)
pub type Sequence = u64;

/// Supplier of the current sequence number
///
/// Implementations must be non-decreasing across calls.
pub trait SequenceSource: Send + Sync {
    /// The current sequence number
    fn current_sequence(&self) -> Sequence;
}

/// A manually driven sequence source
///
/// Can only move forward: `set` with a smaller value is ignored.
#[derive(Debug, Default)]
pub struct LedgerClock {
    sequence: AtomicU64,
}

impl LedgerClock {
    /// Create a clock at sequence 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at a specific sequence
    pub fn starting_at(sequence: Sequence) -> Self {
        Self {
            sequence: AtomicU64::new(sequence),
        }
    }

    /// Advance by `by` sequence units, returning the new sequence
    pub fn advance(&self, by: u64) -> Sequence {
        let previous = self
            .sequence
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
                Some(s.saturating_add(by))
            })
            .unwrap_or_else(|s| s);
        previous.saturating_add(by)
    }

    /// Move the clock to `sequence` if it is ahead of the current one
    pub fn set(&self, sequence: Sequence) -> Sequence {
        self.sequence.fetch_max(sequence, Ordering::AcqRel).max(sequence)
    }
}

impl SequenceSource for LedgerClock {
    fn current_sequence(&self) -> Sequence {
        self.sequence.load(Ordering::Acquire)
    }
}

/// Sequence distance between two points, zero if `to` is behind `from`
pub fn distance(from: Sequence, to: Sequence) -> u64 {
    to.saturating_sub(from)
}
