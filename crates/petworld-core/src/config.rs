//! Lifecycle tunables
//!
//! Every constant the state machine uses lives here so it can be loaded from
//! content files. `Default` reproduces the reference rules. Any interval set to
//! 0 disables the rule it drives.

use serde::{Deserialize, Serialize};

/// All lifecycle rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LifecycleConfig {
    pub decay: DecayConfig,
    pub actions: ActionConfig,
    pub evolution: EvolutionConfig,
    pub revival: RevivalConfig,
    pub achievements: AchievementConfig,
    pub mint: MintConfig,
}

/// Time-driven stat changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Sequence units per +1 hunger
    pub hunger_interval: u64,
    /// Sequence units per -1 happiness
    pub happiness_interval: u64,
    /// Sequence units of starvation per -1 health
    pub health_interval: u64,
    /// Hunger level at which the pet starts losing health
    pub starvation_threshold: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            hunger_interval: 30,
            happiness_interval: 60,
            health_interval: 30,
            starvation_threshold: 100,
        }
    }
}

/// How a chat interaction affects the decay clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChatTouchPolicy {
    /// No stat effect and no clock reset
    #[default]
    Informational,
    /// Apply pending decay, which moves the clock to now
    RefreshClock,
}

/// Player action deltas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub feed_hunger_relief: u32,
    pub feed_happiness: u32,
    pub play_happiness: u32,
    pub chat_touch: ChatTouchPolicy,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            feed_hunger_relief: 40,
            feed_happiness: 15,
            play_happiness: 25,
            chat_touch: ChatTouchPolicy::Informational,
        }
    }
}

/// Stage promotion thresholds (ages are measured from birth)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub baby_age: u64,
    pub teen_age: u64,
    pub adult_age: u64,
    /// Minimum happiness for Baby→Teen and Teen→Adult
    pub happiness_threshold: u32,
    /// Minimum health for Teen→Adult
    pub adult_health_threshold: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            baby_age: 36,
            teen_age: 84,
            adult_age: 144,
            happiness_threshold: 60,
            adult_health_threshold: 80,
        }
    }
}

/// Stats a pet comes back with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevivalConfig {
    pub health: u32,
    pub happiness: u32,
    pub hunger: u32,
}

impl Default for RevivalConfig {
    fn default() -> Self {
        Self {
            health: 50,
            happiness: 30,
            hunger: 50,
        }
    }
}

/// Counter thresholds for streak achievements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementConfig {
    pub feeding_streak: u64,
    pub active_player: u64,
}

impl Default for AchievementConfig {
    fn default() -> Self {
        Self {
            feeding_streak: 10,
            active_player: 10,
        }
    }
}

/// Mint validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    pub max_name_len: usize,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self { max_name_len: 20 }
    }
}
