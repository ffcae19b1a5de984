//! Petworld Core - Pet lifecycle state machine
//!
//! This crate provides the pure rules of a virtual pet's life:
//! - Vital stats that decay with ledger time (`Stats`, `Stat`)
//! - Player actions and their deltas (`ActionKind`)
//! - Stage evolution, death and revival
//! - One-time achievements (`Achievement`, `AchievementRegistry`)
//! - The lifecycle orchestrator that composes them into a `Transition`
//!
//! Time is a monotonic ledger sequence supplied by a `SequenceSource`. No
//! function here reads a wall clock, so every transition is deterministic.
//!
//! ## Storage
//!
//! `PetStore` is the seam between the rules and persistence. Records are
//! versioned; a stale write fails with `Error::VersionConflict`. Each owner
//! also has an `OwnerAchievements` record, so an achievement is earned once
//! per owner no matter how many pets they keep. `MemoryStore` is the
//! in-process implementation.
//!
//! ```rust
//! use petworld_core::{
//!     mint, transition, ActionKind, LifecycleConfig, OwnerAchievements, OwnerId, PetId,
//! };
//!
//! let config = LifecycleConfig::default();
//! let mut alice = OwnerAchievements::new(OwnerId::new("alice"));
//! let born = mint(PetId::new(1), &alice, "Mochi", 0, &config).unwrap();
//! alice.record(born.unlocked());
//!
//! let fed = transition(&born.pet, &ActionKind::Feed, 600, &alice, &config).unwrap();
//! assert_eq!(fed.pet.feed_count, 1);
//! ```

pub mod achievement;
pub mod action;
pub mod config;
pub mod decay;
mod error;
mod event;
pub mod evolution;
mod identity;
pub mod lifecycle;
mod pet;
pub mod store;
pub mod time;
pub mod vitality;

pub use achievement::{
    Achievement, AchievementInfo, AchievementRegistry, Milestones, OwnerAchievements, Rarity,
};
pub use action::ActionKind;
pub use config::{
    AchievementConfig, ActionConfig, ChatTouchPolicy, DecayConfig, EvolutionConfig,
    LifecycleConfig, MintConfig, RevivalConfig,
};
pub use error::{Error, Result};
pub use event::{Event, EventKind};
pub use evolution::Evolution;
pub use identity::{OwnerId, PetId};
pub use lifecycle::{mint, transfer, transition, Transition};
pub use pet::{Pet, PetInfo, Stage, Stat, StatDelta, Stats};
pub use store::{MemoryStore, PetStore, Version, Versioned};
pub use time::{LedgerClock, Sequence, SequenceSource};
