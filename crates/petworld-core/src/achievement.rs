//! Achievements: identifiers, catalog metadata and unlock rules
//!
//! The evaluator is stateless. It looks at a post-transition pet, the owner's
//! earned set and the milestones the transition produced, and reports which
//! achievements are newly unlocked. Earning is once per owner: anything the
//! owner or the pet already holds is skipped, never an error.

use crate::config::AchievementConfig;
use crate::{Evolution, OwnerId, Pet, Stage};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A one-time unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstPet,
    FirstEvolution,
    SurvivedDeath,
    SecondEvolution,
    PerfectStats,
    FeedingStreak,
    ActivePlayer,
    FinalEvolution,
}

impl Achievement {
    pub const ALL: [Achievement; 8] = [
        Achievement::FirstPet,
        Achievement::FirstEvolution,
        Achievement::SurvivedDeath,
        Achievement::SecondEvolution,
        Achievement::PerfectStats,
        Achievement::FeedingStreak,
        Achievement::ActivePlayer,
        Achievement::FinalEvolution,
    ];

    /// Stable numeric id shared with the on-ledger badge registry
    pub fn id(&self) -> u32 {
        match self {
            Achievement::FirstPet => 0,
            Achievement::FirstEvolution => 1,
            Achievement::SurvivedDeath => 2,
            Achievement::SecondEvolution => 3,
            Achievement::PerfectStats => 4,
            Achievement::FeedingStreak => 5,
            Achievement::ActivePlayer => 6,
            Achievement::FinalEvolution => 7,
        }
    }

    /// Look up by numeric id
    pub fn from_id(id: u32) -> Option<Achievement> {
        Self::ALL.iter().copied().find(|a| a.id() == id)
    }

    /// The achievement unlocked by evolving into `stage`
    pub fn for_stage(stage: Stage) -> Option<Achievement> {
        match stage {
            Stage::Egg => None,
            Stage::Baby => Some(Achievement::FirstEvolution),
            Stage::Teen => Some(Achievement::SecondEvolution),
            Stage::Adult => Some(Achievement::FinalEvolution),
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "achievement:{}", self.id())
    }
}

/// Rarity tier shown next to a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Display metadata for an achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementInfo {
    pub achievement: Achievement,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub icon: String,
    /// Global count of holders, maintained outside the state machine
    #[serde(default)]
    pub total_earned: u64,
}

impl AchievementInfo {
    pub fn new(
        achievement: Achievement,
        name: impl Into<String>,
        description: impl Into<String>,
        rarity: Rarity,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            achievement,
            name: name.into(),
            description: description.into(),
            rarity,
            icon: icon.into(),
            total_earned: 0,
        }
    }
}

/// Read-only catalog of achievement metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementRegistry {
    entries: IndexMap<Achievement, AchievementInfo>,
}

impl AchievementRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let defs = [
            (Achievement::FirstPet, "First Steps", "Mint your first pet", Rarity::Common, "🥚"),
            (Achievement::FirstEvolution, "Metamorphosis", "Evolve your pet for the first time", Rarity::Rare, "🦋"),
            (Achievement::SurvivedDeath, "Death Survivor", "Revive a pet from death", Rarity::Rare, "💀"),
            (Achievement::SecondEvolution, "Triple Evolution", "Reach the Teen stage", Rarity::Epic, "🌟"),
            (Achievement::PerfectStats, "Perfectionist", "Max out happiness and health with zero hunger", Rarity::Epic, "💯"),
            (Achievement::FeedingStreak, "Streak Master", "Feed your pet 10 times", Rarity::Uncommon, "🔥"),
            (Achievement::ActivePlayer, "Active Player", "Win 10 games with your pet", Rarity::Uncommon, "🎮"),
            (Achievement::FinalEvolution, "Legend", "Reach the Adult stage", Rarity::Legendary, "👑"),
        ];
        for (achievement, name, description, rarity, icon) in defs {
            registry.insert(AchievementInfo::new(achievement, name, description, rarity, icon));
        }
        registry
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, info: AchievementInfo) -> Option<AchievementInfo> {
        self.entries.insert(info.achievement, info)
    }

    pub fn get(&self, achievement: Achievement) -> Option<&AchievementInfo> {
        self.entries.get(&achievement)
    }

    pub fn contains(&self, achievement: Achievement) -> bool {
        self.entries.contains_key(&achievement)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementInfo> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this registry with `total_earned` taken from `totals`
    pub fn with_totals(&self, totals: &IndexMap<Achievement, u64>) -> Self {
        let mut registry = self.clone();
        for info in registry.entries.values_mut() {
            info.total_earned = totals.get(&info.achievement).copied().unwrap_or(0);
        }
        registry
    }
}

/// Achievements an owner has earned, across every pet they have held
///
/// The record stays with the owner when a pet changes hands; the pet keeps
/// its own badges in [`Pet::achievements`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAchievements {
    pub owner: OwnerId,
    /// Earned achievements, in unlock order
    pub earned: IndexSet<Achievement>,
}

impl OwnerAchievements {
    /// An owner with nothing earned yet
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            earned: IndexSet::new(),
        }
    }

    pub fn has_earned(&self, achievement: Achievement) -> bool {
        self.earned.contains(&achievement)
    }

    /// Number of distinct achievements earned
    pub fn count(&self) -> usize {
        self.earned.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.earned.iter().copied()
    }

    /// Add unlocks to the record; returns true if any was new
    pub fn record(&mut self, unlocked: impl IntoIterator<Item = Achievement>) -> bool {
        let before = self.earned.len();
        self.earned.extend(unlocked);
        self.earned.len() > before
    }
}

/// What a transition did, beyond the resulting state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Milestones {
    /// The owner's first successful mint
    pub first_mint: bool,
    pub evolution: Option<Evolution>,
    pub revived: bool,
    /// Whether state-based rules (stats, counters) apply
    pub state_rules: bool,
}

impl Milestones {
    /// Milestones of a mint
    pub fn minted(first_for_owner: bool) -> Self {
        Self {
            first_mint: first_for_owner,
            ..Default::default()
        }
    }

    /// Milestones of an action transition
    pub fn transition(evolution: Option<Evolution>, revived: bool) -> Self {
        Self {
            first_mint: false,
            evolution,
            revived,
            state_rules: true,
        }
    }
}

/// Achievements newly unlocked by `pet` reaching its current state
///
/// `owner` is the earned record of the pet's owner before this transition.
pub fn evaluate(
    pet: &Pet,
    owner: &OwnerAchievements,
    milestones: &Milestones,
    config: &AchievementConfig,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    let mut consider = |achievement: Achievement, reached: bool| {
        if reached
            && !owner.has_earned(achievement)
            && !pet.has_achievement(achievement)
            && !unlocked.contains(&achievement)
        {
            unlocked.push(achievement);
        }
    };

    consider(Achievement::FirstPet, milestones.first_mint);

    if let Some(evolution) = milestones.evolution {
        if let Some(achievement) = Achievement::for_stage(evolution.to) {
            consider(achievement, true);
        }
    }

    consider(Achievement::SurvivedDeath, milestones.revived);

    if milestones.state_rules {
        consider(Achievement::PerfectStats, pet.stats.is_perfect());
        consider(
            Achievement::FeedingStreak,
            config.feeding_streak > 0 && pet.feed_count >= config.feeding_streak,
        );
        consider(
            Achievement::ActivePlayer,
            config.active_player > 0 && pet.play_count >= config.active_player,
        );
    }

    unlocked
}

/// Evaluate and record newly unlocked achievements on `pet`
pub fn unlock(
    pet: &mut Pet,
    owner: &OwnerAchievements,
    milestones: &Milestones,
    config: &AchievementConfig,
) -> Vec<Achievement> {
    let unlocked = evaluate(pet, owner, milestones, config);
    for achievement in &unlocked {
        pet.award(*achievement);
    }
    unlocked
}
