//! Lifecycle rules schema

use crate::error::{Error, Result};
use petworld_core::LifecycleConfig;
use serde::{Deserialize, Serialize};

/// A rules document; omitted fields keep their defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulesFile {
    pub rules: LifecycleConfig,
}

/// Reject rule sets the state machine cannot honor
///
/// Stat-valued settings must fit the 0..=100 range and a pet name must be
/// allowed at least one character.
pub fn validate(rules: &LifecycleConfig) -> Result<()> {
    let stats = [
        ("decay.starvation_threshold", rules.decay.starvation_threshold),
        ("actions.feed_hunger_relief", rules.actions.feed_hunger_relief),
        ("actions.feed_happiness", rules.actions.feed_happiness),
        ("actions.play_happiness", rules.actions.play_happiness),
        ("evolution.happiness_threshold", rules.evolution.happiness_threshold),
        ("evolution.adult_health_threshold", rules.evolution.adult_health_threshold),
        ("revival.health", rules.revival.health),
        ("revival.happiness", rules.revival.happiness),
        ("revival.hunger", rules.revival.hunger),
    ];
    for (field, value) in stats {
        if value > 100 {
            return Err(Error::InvalidSchema(format!(
                "{} must be at most 100, got {}",
                field, value
            )));
        }
    }

    if rules.revival.health == 0 {
        return Err(Error::InvalidSchema(
            "revival.health must be positive".to_string(),
        ));
    }

    let evolution = &rules.evolution;
    if !(evolution.baby_age <= evolution.teen_age && evolution.teen_age <= evolution.adult_age) {
        return Err(Error::InvalidSchema(
            "evolution ages must be non-decreasing".to_string(),
        ));
    }

    if rules.mint.max_name_len == 0 {
        return Err(Error::InvalidSchema(
            "mint.max_name_len must be positive".to_string(),
        ));
    }
    Ok(())
}
