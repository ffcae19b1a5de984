//! Events emitted by lifecycle transitions

use crate::{Achievement, OwnerId, PetId, Sequence, Stage, Stats};
use serde::{Deserialize, Serialize};

/// What happened, with its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new pet was created
    Minted,
    /// Vital stats differ from before the transition
    StatsChanged { before: Stats, after: Stats },
    /// The pet advanced a stage
    Evolved { from: Stage, to: Stage },
    /// Health reached zero
    Died,
    /// A dead pet was brought back
    Revived,
    /// An achievement was earned for the first time
    AchievementUnlocked(Achievement),
    /// The pet changed hands
    Transferred { from: OwnerId, to: OwnerId },
}

impl EventKind {
    /// Stable type name, e.g. for grouping in reports
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Minted => "minted",
            EventKind::StatsChanged { .. } => "statsChanged",
            EventKind::Evolved { .. } => "evolved",
            EventKind::Died => "died",
            EventKind::Revived => "revived",
            EventKind::AchievementUnlocked(_) => "achievementUnlocked",
            EventKind::Transferred { .. } => "transferred",
        }
    }
}

/// An event about one pet at one sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub pet: PetId,
    /// Sequence of the transition that produced this event
    pub sequence: Sequence,
}

impl Event {
    /// Create a new event
    pub fn new(kind: EventKind, pet: PetId, sequence: Sequence) -> Self {
        Self {
            kind,
            pet,
            sequence,
        }
    }

    pub fn minted(pet: PetId, sequence: Sequence) -> Self {
        Self::new(EventKind::Minted, pet, sequence)
    }

    pub fn stats_changed(pet: PetId, before: Stats, after: Stats, sequence: Sequence) -> Self {
        Self::new(EventKind::StatsChanged { before, after }, pet, sequence)
    }

    pub fn evolved(pet: PetId, from: Stage, to: Stage, sequence: Sequence) -> Self {
        Self::new(EventKind::Evolved { from, to }, pet, sequence)
    }

    pub fn died(pet: PetId, sequence: Sequence) -> Self {
        Self::new(EventKind::Died, pet, sequence)
    }

    pub fn revived(pet: PetId, sequence: Sequence) -> Self {
        Self::new(EventKind::Revived, pet, sequence)
    }

    pub fn achievement(pet: PetId, achievement: Achievement, sequence: Sequence) -> Self {
        Self::new(EventKind::AchievementUnlocked(achievement), pet, sequence)
    }

    pub fn transferred(pet: PetId, from: OwnerId, to: OwnerId, sequence: Sequence) -> Self {
        Self::new(EventKind::Transferred { from, to }, pet, sequence)
    }

    /// The unlocked achievement, if this is an unlock event
    pub fn unlocked(&self) -> Option<Achievement> {
        match self.kind {
            EventKind::AchievementUnlocked(achievement) => Some(achievement),
            _ => None,
        }
    }
}
