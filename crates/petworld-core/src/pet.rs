//! The pet record and its vital stats

use crate::{time, Achievement, OwnerId, PetId, Sequence};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage, ordered from youngest to oldest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Stage {
    #[default]
    Egg,
    Baby,
    Teen,
    Adult,
}

impl Stage {
    /// All stages in lifecycle order
    pub const ALL: [Stage; 4] = [Stage::Egg, Stage::Baby, Stage::Teen, Stage::Adult];

    /// Position in the lifecycle (Egg = 0)
    pub fn rank(&self) -> u8 {
        match self {
            Stage::Egg => 0,
            Stage::Baby => 1,
            Stage::Teen => 2,
            Stage::Adult => 3,
        }
    }

    /// The stage that follows this one, `None` for Adult
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Egg => Some(Stage::Baby),
            Stage::Baby => Some(Stage::Teen),
            Stage::Teen => Some(Stage::Adult),
            Stage::Adult => None,
        }
    }

    /// Look up a stage by rank
    pub fn from_rank(rank: u8) -> Option<Stage> {
        Self::ALL.get(rank as usize).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Egg => "Egg",
            Stage::Baby => "Baby",
            Stage::Teen => "Teen",
            Stage::Adult => "Adult",
        };
        f.write_str(name)
    }
}

/// A vital stat value, always within `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Stat(u8);

impl Stat {
    pub const MIN: Stat = Stat(0);
    pub const MAX: Stat = Stat(100);

    /// Create a stat, clamping to `[0, 100]`
    pub fn new(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    /// Raw value
    pub fn get(&self) -> u32 {
        self.0 as u32
    }

    /// Increase, saturating at 100
    pub fn raise(self, amount: u32) -> Self {
        Self::new(self.get().saturating_add(amount))
    }

    /// Decrease, saturating at 0
    pub fn lower(self, amount: u32) -> Self {
        Self::new(self.get().saturating_sub(amount))
    }

    /// Apply a signed delta with clamping
    pub fn shift(self, delta: i32) -> Self {
        if delta >= 0 {
            self.raise(delta.unsigned_abs())
        } else {
            self.lower(delta.unsigned_abs())
        }
    }

    pub fn is_min(&self) -> bool {
        self.0 == 0
    }

    pub fn is_max(&self) -> bool {
        self.0 == 100
    }
}

impl TryFrom<u32> for Stat {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > 100 {
            Err(format!("stat value {} out of range 0..=100", value))
        } else {
            Ok(Self(value as u8))
        }
    }
}

impl From<Stat> for u32 {
    fn from(stat: Stat) -> Self {
        stat.get()
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three vital stats of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub happiness: Stat,
    pub hunger: Stat,
    pub health: Stat,
}

impl Stats {
    /// Stats of a freshly minted pet
    pub const NEWBORN: Stats = Stats {
        happiness: Stat::MAX,
        hunger: Stat::MIN,
        health: Stat::MAX,
    };

    /// Create from raw values, clamping each to `[0, 100]`
    pub fn new(happiness: u32, hunger: u32, health: u32) -> Self {
        Self {
            happiness: Stat::new(happiness),
            hunger: Stat::new(hunger),
            health: Stat::new(health),
        }
    }

    /// Fully happy, not hungry, fully healthy
    pub fn is_perfect(&self) -> bool {
        self.happiness.is_max() && self.hunger.is_min() && self.health.is_max()
    }

    /// Apply signed deltas to every stat with clamping
    pub fn shifted(&self, delta: &StatDelta) -> Self {
        Self {
            happiness: self.happiness.shift(delta.happiness),
            hunger: self.hunger.shift(delta.hunger),
            health: self.health.shift(delta.health),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::NEWBORN
    }
}

/// Signed stat adjustments, e.g. accumulated from minigame outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StatDelta {
    #[serde(default)]
    pub happiness: i32,
    #[serde(default)]
    pub hunger: i32,
    #[serde(default)]
    pub health: i32,
}

impl StatDelta {
    pub fn new(happiness: i32, hunger: i32, health: i32) -> Self {
        Self {
            happiness,
            hunger,
            health,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.happiness == 0 && self.hunger == 0 && self.health == 0
    }
}

/// A pet record
///
/// Records are values: every transition produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub owner: OwnerId,
    pub name: String,
    pub stage: Stage,
    pub stats: Stats,
    /// Sequence at mint, never changes
    pub birth_sequence: Sequence,
    /// Sequence up to which decay has been applied
    pub last_update_sequence: Sequence,
    pub alive: bool,
    /// Sequence of the most recent death while dead
    #[serde(default)]
    pub died_at: Option<Sequence>,
    pub feed_count: u64,
    pub play_count: u64,
    #[serde(default)]
    pub achievements: IndexSet<Achievement>,
}

impl Pet {
    /// Create a newborn egg
    pub fn new(id: PetId, owner: OwnerId, name: impl Into<String>, birth: Sequence) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            stage: Stage::Egg,
            stats: Stats::NEWBORN,
            birth_sequence: birth,
            last_update_sequence: birth,
            alive: true,
            died_at: None,
            feed_count: 0,
            play_count: 0,
            achievements: IndexSet::new(),
        }
    }

    /// Age at `current`, derived from the birth sequence
    pub fn age(&self, current: Sequence) -> u64 {
        time::distance(self.birth_sequence, current)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Alive and not at zero health
    pub fn can_act(&self) -> bool {
        self.alive && !self.stats.health.is_min()
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Record an achievement, returning false if it was already earned
    pub fn award(&mut self, achievement: Achievement) -> bool {
        self.achievements.insert(achievement)
    }

    /// Read view with derived values at `current`
    pub fn info(&self, current: Sequence) -> PetInfo {
        PetInfo {
            age: self.age(current),
            sequences_since_update: time::distance(self.last_update_sequence, current),
            pet: self.clone(),
        }
    }
}

/// A pet with values derived at a given sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetInfo {
    pub pet: Pet,
    pub age: u64,
    pub sequences_since_update: u64,
}
