//! Evolution resolver
//!
//! Checks the promotion table top-down and advances at most one stage per
//! evaluation. Stages never regress.

use crate::config::EvolutionConfig;
use crate::{Pet, Sequence, Stage};
use serde::{Deserialize, Serialize};

/// A stage promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evolution {
    pub from: Stage,
    pub to: Stage,
}

/// The stage `pet` qualifies for at `current`, if it can advance
///
/// Dead pets and pets at zero health never evolve.
pub fn next_stage(pet: &Pet, current: Sequence, config: &EvolutionConfig) -> Option<Stage> {
    if !pet.can_act() {
        return None;
    }

    let age = pet.age(current);
    let happiness = pet.stats.happiness.get();
    let health = pet.stats.health.get();

    let qualifies = match pet.stage {
        Stage::Egg => age >= config.baby_age,
        Stage::Baby => age >= config.teen_age && happiness >= config.happiness_threshold,
        Stage::Teen => {
            age >= config.adult_age
                && happiness >= config.happiness_threshold
                && health >= config.adult_health_threshold
        }
        Stage::Adult => false,
    };

    if qualifies {
        pet.stage.next()
    } else {
        None
    }
}

/// Promote `pet` by one stage if it qualifies
pub fn evolve(pet: &mut Pet, current: Sequence, config: &EvolutionConfig) -> Option<Evolution> {
    let to = next_stage(pet, current, config)?;
    let evolution = Evolution {
        from: pet.stage,
        to,
    };
    pet.stage = to;
    Some(evolution)
}
