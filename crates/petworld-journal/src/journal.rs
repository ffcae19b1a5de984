//! Event journal for recording and auditing lifecycle transitions
//!
//! The journal provides:
//! - Event recording in commit order
//! - Free-form metadata entries for audit trails
//! - Running achievement unlock totals
//!
//! # Example
//!
//! ```rust
//! use petworld_core::{Event, PetId};
//! use petworld_journal::Journal;
//!
//! let mut journal = Journal::new();
//! journal.record(Event::minted(PetId::new(1), 0));
//! assert_eq!(journal.stats().event_count, 1);
//! ```

use indexmap::IndexMap;
use petworld_core::{Achievement, Event, PetId, Sequence};
use serde::{Deserialize, Serialize};

/// A journal entry representing a recorded fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalEntry {
    /// A lifecycle event was committed
    Event {
        /// Position in the journal, counting from 0
        index: u64,
        /// The committed event
        event: Event,
    },
    /// Custom metadata entry (for auditing)
    Metadata {
        /// The sequence when this was recorded
        sequence: Sequence,
        /// Key for the metadata
        key: String,
        /// Value (serialized)
        value: String,
    },
}

impl JournalEntry {
    /// Sequence this entry belongs to
    pub fn sequence(&self) -> Sequence {
        match self {
            JournalEntry::Event { event, .. } => event.sequence,
            JournalEntry::Metadata { sequence, .. } => *sequence,
        }
    }

    /// The event, if this is an event entry
    pub fn event(&self) -> Option<&Event> {
        match self {
            JournalEntry::Event { event, .. } => Some(event),
            JournalEntry::Metadata { .. } => None,
        }
    }
}

/// Configuration for the journal
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Whether recording is enabled
    pub recording_enabled: bool,
    /// Maximum number of entries to keep (0 = unlimited)
    pub max_entries: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            recording_enabled: true,
            max_entries: 0, // Unlimited
        }
    }
}

/// The journal of committed lifecycle events
#[derive(Debug, Clone)]
pub struct Journal {
    config: JournalConfig,
    entries: Vec<JournalEntry>,
    /// Index of the next event entry
    next_index: u64,
    /// Unlock counts, kept across entry eviction
    unlock_totals: IndexMap<Achievement, u64>,
}

impl Journal {
    /// Create a new recording journal
    pub fn new() -> Self {
        Self::with_config(JournalConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            next_index: 0,
            unlock_totals: IndexMap::new(),
        }
    }

    /// Start recording
    pub fn start_recording(&mut self) {
        self.config.recording_enabled = true;
    }

    /// Stop recording
    pub fn stop_recording(&mut self) {
        self.config.recording_enabled = false;
    }

    /// Check if recording is enabled
    pub fn is_recording(&self) -> bool {
        self.config.recording_enabled
    }

    /// Record one committed event
    pub fn record(&mut self, event: Event) {
        if !self.config.recording_enabled {
            return;
        }

        if let Some(achievement) = event.unlocked() {
            *self.unlock_totals.entry(achievement).or_insert(0) += 1;
        }

        self.entries.push(JournalEntry::Event {
            index: self.next_index,
            event,
        });
        self.next_index += 1;

        self.enforce_limits();
    }

    /// Record the events of one transition, in order
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.record(event.clone());
        }
    }

    /// Record custom metadata (for auditing)
    pub fn record_metadata(
        &mut self,
        sequence: Sequence,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        if !self.config.recording_enabled {
            return;
        }

        self.entries.push(JournalEntry::Metadata {
            sequence,
            key: key.into(),
            value: value.into(),
        });

        self.enforce_limits();
    }

    /// Get all entries
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Get entries in a sequence range (inclusive)
    pub fn entries_in_range(&self, start: Sequence, end: Sequence) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|e| {
                let s = e.sequence();
                s >= start && s <= end
            })
            .collect()
    }

    /// Get events only
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().filter_map(JournalEntry::event)
    }

    /// Get the events of one pet
    pub fn events_for(&self, pet: PetId) -> impl Iterator<Item = &Event> {
        self.events().filter(move |e| e.pet == pet)
    }

    /// How many times each achievement has been unlocked while recording
    pub fn unlock_totals(&self) -> &IndexMap<Achievement, u64> {
        &self.unlock_totals
    }

    /// Clear all entries and totals
    pub fn clear(&mut self) {
        self.entries.clear();
        self.unlock_totals.clear();
        self.next_index = 0;
    }

    /// Get statistics about the journal
    pub fn stats(&self) -> JournalStats {
        let event_count = self.events().count();
        let mut pets: Vec<PetId> = self.events().map(|e| e.pet).collect();
        pets.sort();
        pets.dedup();

        JournalStats {
            total_entries: self.entries.len(),
            event_count,
            pet_count: pets.len(),
            first_sequence: self.entries.iter().map(JournalEntry::sequence).min(),
            last_sequence: self.entries.iter().map(JournalEntry::sequence).max(),
        }
    }

    fn enforce_limits(&mut self) {
        if self.config.max_entries > 0 && self.entries.len() > self.config.max_entries {
            let excess = self.entries.len() - self.config.max_entries;
            self.entries.drain(0..excess);
        }
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the journal
#[derive(Debug, Clone, Serialize)]
pub struct JournalStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Number of event entries
    pub event_count: usize,
    /// Number of distinct pets with events
    pub pet_count: usize,
    /// Lowest sequence recorded
    pub first_sequence: Option<Sequence>,
    /// Highest sequence recorded
    pub last_sequence: Option<Sequence>,
}
