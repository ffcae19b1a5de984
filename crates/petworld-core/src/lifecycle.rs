//! Lifecycle orchestrator
//!
//! Composes the decay engine, action processor, evolution resolver,
//! death/revival resolver and achievement evaluator into one pure transition.
//! Persistence is the caller's concern: a transition is either committed as
//! a whole or discarded.
//!
//! Order of steps:
//! 1. decay to the current sequence
//! 2. action deltas (living pets only)
//! 3. evolution check
//! 4. death check
//! 5. revival (only for [`ActionKind::Revive`])
//! 6. achievement check, against the owner's earned record
//!
//! Ownership changes go through [`transfer`], which touches nothing else.

use crate::achievement::{self, Milestones, OwnerAchievements};
use crate::config::{LifecycleConfig, MintConfig};
use crate::{action, evolution, vitality};
use crate::{ActionKind, Error, Event, OwnerId, Pet, PetId, Result, Sequence};

/// The outcome of one committed-or-nothing state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new pet record
    pub pet: Pet,
    /// Events in the order they happened
    pub events: Vec<Event>,
}

impl Transition {
    /// Achievements unlocked by this transition
    pub fn unlocked(&self) -> impl Iterator<Item = crate::Achievement> + '_ {
        self.events.iter().filter_map(Event::unlocked)
    }
}

/// Apply `kind` to `pet` at `current`
///
/// `owner` is what the pet's owner has earned so far; achievements in it are
/// not unlocked again.
pub fn transition(
    pet: &Pet,
    kind: &ActionKind,
    current: Sequence,
    owner: &OwnerAchievements,
    config: &LifecycleConfig,
) -> Result<Transition> {
    let mut next = action::process(pet, kind, current, config)?;

    let evolution = evolution::evolve(&mut next, current, &config.evolution);
    let died = vitality::check_death(&mut next, current);

    let revived = if matches!(kind, ActionKind::Revive) {
        vitality::revive(&mut next, current, &config.revival)?;
        true
    } else {
        false
    };

    let unlocked = achievement::unlock(
        &mut next,
        owner,
        &Milestones::transition(evolution, revived),
        &config.achievements,
    );

    let id = next.id;
    let mut events = Vec::new();
    if next.stats != pet.stats {
        events.push(Event::stats_changed(id, pet.stats, next.stats, current));
    }
    if let Some(evolution) = evolution {
        events.push(Event::evolved(id, evolution.from, evolution.to, current));
    }
    if died {
        events.push(Event::died(id, current));
    }
    if revived {
        events.push(Event::revived(id, current));
    }
    events.extend(
        unlocked
            .into_iter()
            .map(|achievement| Event::achievement(id, achievement, current)),
    );

    Ok(Transition { pet: next, events })
}

/// Check a pet name against the mint rules
pub fn validate_name(name: &str, config: &MintConfig) -> Result<()> {
    let len = name.chars().count();
    if name.trim().is_empty() || len > config.max_name_len {
        return Err(Error::InvalidName(format!(
            "{:?} must be 1 to {} characters",
            name, config.max_name_len
        )));
    }
    Ok(())
}

/// Create a new pet for `owner` at `current`
///
/// The first-pet achievement is unlocked unless the owner already holds it.
pub fn mint(
    id: PetId,
    owner: &OwnerAchievements,
    name: &str,
    current: Sequence,
    config: &LifecycleConfig,
) -> Result<Transition> {
    validate_name(name, &config.mint)?;

    let mut pet = Pet::new(id, owner.owner.clone(), name, current);
    let unlocked = achievement::unlock(
        &mut pet,
        owner,
        &Milestones::minted(true),
        &config.achievements,
    );

    let mut events = vec![Event::minted(id, current)];
    events.extend(
        unlocked
            .into_iter()
            .map(|achievement| Event::achievement(id, achievement, current)),
    );

    Ok(Transition { pet, events })
}

/// Hand `pet` from `from` to `to`
///
/// Only the owner binding changes. Badges stay on the pet; the earned
/// records of both owners are untouched. Handing a pet to its current owner
/// yields no events.
pub fn transfer(pet: &Pet, from: &OwnerId, to: OwnerId, current: Sequence) -> Result<Transition> {
    if &pet.owner != from {
        return Err(Error::NotOwner {
            pet: pet.id,
            owner: from.clone(),
        });
    }

    let mut next = pet.clone();
    if next.owner == to {
        return Ok(Transition {
            pet: next,
            events: Vec::new(),
        });
    }

    next.owner = to.clone();
    let events = vec![Event::transferred(pet.id, from.clone(), to, current)];
    Ok(Transition { pet: next, events })
}
