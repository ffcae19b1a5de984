//! Death and revival resolver

use crate::config::RevivalConfig;
use crate::{Error, Pet, Result, Sequence, Stats};

/// Mark `pet` dead if its health is depleted
///
/// Returns true only on the transition from alive to dead.
pub fn check_death(pet: &mut Pet, current: Sequence) -> bool {
    if pet.alive && pet.stats.health.is_min() {
        pet.alive = false;
        pet.died_at = Some(current);
        true
    } else {
        false
    }
}

/// Bring a dead pet back at the revival baseline
///
/// Stage, age, counters and achievements are untouched. The decay clock
/// restarts at `current`.
pub fn revive(pet: &mut Pet, current: Sequence, config: &RevivalConfig) -> Result<()> {
    if pet.alive {
        return Err(Error::NotDead(pet.id));
    }
    pet.stats = Stats::new(config.happiness, config.hunger, config.health);
    pet.alive = true;
    pet.died_at = None;
    pet.last_update_sequence = pet.last_update_sequence.max(current);
    Ok(())
}
