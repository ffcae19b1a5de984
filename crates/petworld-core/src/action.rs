//! Action processor
//!
//! Every action first brings the pet's stats up to date with the decay engine,
//! then applies its own deltas.

use crate::config::{ActionConfig, ChatTouchPolicy, LifecycleConfig};
use crate::{decay, Error, Pet, Result, Sequence, StatDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player or system request against one pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Feed,
    /// A minigame round; only a win has an effect
    Play { won: bool },
    /// A chat message; no stat effect
    ChatTouch,
    /// Decay only
    ForceUpdate,
    Revive,
    /// Signed deltas accumulated outside the core, e.g. by minigame events
    ApplyEffects(StatDelta),
}

impl ActionKind {
    /// Whether the action may target a dead pet
    pub fn allowed_when_dead(&self) -> bool {
        matches!(self, ActionKind::ForceUpdate | ActionKind::Revive)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Feed => "feed",
            ActionKind::Play { .. } => "play",
            ActionKind::ChatTouch => "chat_touch",
            ActionKind::ForceUpdate => "force_update",
            ActionKind::Revive => "revive",
            ActionKind::ApplyEffects(_) => "apply_effects",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decay `pet` to `current` and apply the deltas of `kind`
///
/// Fails with [`Error::DeadPet`] when an action that needs a living pet finds
/// it dead, or at zero health after decay. `Revive` has no deltas here.
pub fn process(
    pet: &Pet,
    kind: &ActionKind,
    current: Sequence,
    config: &LifecycleConfig,
) -> Result<Pet> {
    let skip_decay = matches!(kind, ActionKind::ChatTouch)
        && config.actions.chat_touch == ChatTouchPolicy::Informational;

    let mut next = if skip_decay {
        if current < pet.last_update_sequence {
            return Err(Error::InvalidSequence {
                pet: pet.id,
                current,
                last: pet.last_update_sequence,
            });
        }
        pet.clone()
    } else {
        decay::decay(pet, current, &config.decay)?
    };

    if !kind.allowed_when_dead() && !next.can_act() {
        return Err(Error::DeadPet(pet.id));
    }

    apply_deltas(&mut next, kind, &config.actions);
    Ok(next)
}

/// Action-specific stat and counter changes, without decay
pub fn apply_deltas(pet: &mut Pet, kind: &ActionKind, config: &ActionConfig) {
    match kind {
        ActionKind::Feed => {
            pet.stats.hunger = pet.stats.hunger.lower(config.feed_hunger_relief);
            pet.stats.happiness = pet.stats.happiness.raise(config.feed_happiness);
            pet.feed_count = pet.feed_count.saturating_add(1);
        }
        ActionKind::Play { won: true } => {
            pet.stats.happiness = pet.stats.happiness.raise(config.play_happiness);
            pet.play_count = pet.play_count.saturating_add(1);
        }
        ActionKind::ApplyEffects(delta) => {
            pet.stats = pet.stats.shifted(delta);
        }
        ActionKind::Play { won: false }
        | ActionKind::ChatTouch
        | ActionKind::ForceUpdate
        | ActionKind::Revive => {}
    }
}

/// Feed `pet` at `current`
pub fn feed(pet: &Pet, current: Sequence, config: &LifecycleConfig) -> Result<Pet> {
    process(pet, &ActionKind::Feed, current, config)
}

/// Play a round with `pet` at `current`
pub fn play(pet: &Pet, won: bool, current: Sequence, config: &LifecycleConfig) -> Result<Pet> {
    process(pet, &ActionKind::Play { won }, current, config)
}

/// Register a chat interaction with `pet` at `current`
pub fn chat_touch(pet: &Pet, current: Sequence, config: &LifecycleConfig) -> Result<Pet> {
    process(pet, &ActionKind::ChatTouch, current, config)
}

/// Decay `pet` to `current` with no action deltas
pub fn force_update(pet: &Pet, current: Sequence, config: &LifecycleConfig) -> Result<Pet> {
    process(pet, &ActionKind::ForceUpdate, current, config)
}
