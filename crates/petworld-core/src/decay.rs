//! Decay engine
//!
//! Normalizes a pet's stats to a given sequence. Pure and total apart from
//! the monotonic clock check: stat math saturates instead of failing.

use crate::config::DecayConfig;
use crate::{Error, Pet, Result, Sequence, Stats};

/// Stat change over `elapsed` sequence units
///
/// An interval of 0 disables the corresponding rule.
pub fn decayed_stats(stats: &Stats, elapsed: u64, config: &DecayConfig) -> Stats {
    if elapsed == 0 {
        return *stats;
    }

    let hunger_gain = elapsed.checked_div(config.hunger_interval).unwrap_or(0);
    let happiness_loss = elapsed.checked_div(config.happiness_interval).unwrap_or(0);

    let hunger = stats.hunger.raise(saturate(hunger_gain));
    let happiness = stats.happiness.lower(saturate(happiness_loss));

    let starving = starving_time(stats.hunger.get(), elapsed, config);
    let health_loss = starving.checked_div(config.health_interval).unwrap_or(0);
    let health = stats.health.lower(saturate(health_loss));

    Stats {
        happiness,
        hunger,
        health,
    }
}

/// Portion of `elapsed` spent with hunger at or above the starvation threshold
fn starving_time(hunger_before: u32, elapsed: u64, config: &DecayConfig) -> u64 {
    if hunger_before >= config.starvation_threshold {
        return elapsed;
    }
    if config.hunger_interval == 0 {
        return 0;
    }
    let points_to_starve = (config.starvation_threshold - hunger_before) as u64;
    let time_to_starve = points_to_starve.saturating_mul(config.hunger_interval);
    elapsed.saturating_sub(time_to_starve)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Apply decay to `pet` up to `current`
///
/// Only stats and `last_update_sequence` change. A dead pet's stats are
/// frozen; its clock still advances so the interval is never charged twice.
pub fn decay(pet: &Pet, current: Sequence, config: &DecayConfig) -> Result<Pet> {
    if current < pet.last_update_sequence {
        return Err(Error::InvalidSequence {
            pet: pet.id,
            current,
            last: pet.last_update_sequence,
        });
    }

    let elapsed = current - pet.last_update_sequence;
    let mut next = pet.clone();
    if elapsed == 0 {
        return Ok(next);
    }

    if pet.alive {
        next.stats = decayed_stats(&pet.stats, elapsed, config);
    }
    next.last_update_sequence = current;
    Ok(next)
}
