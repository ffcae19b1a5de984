//! Hub - Lifecycle service over a pet store
//!
//! The hub wraps the pure lifecycle transition with everything a deployment
//! needs: loading and persisting records with compare-and-set versions, the
//! current sequence, event journaling, logging and the periodic sweep.
//!
//! Every operation takes `&self`, so one hub can be shared across threads.
//! Concurrent transitions of the same pet are serialized by the store: the
//! loser of a race gets a version conflict and the hub re-runs it.

use crate::config::HubConfig;
use crate::error::Result;
use crate::sweep::{SweepOutcome, SweepReport, SweepState};
use petworld_config::{load_content, Content};
use petworld_core::{
    lifecycle, Achievement, ActionKind, AchievementRegistry, Error as CoreError, Event, EventKind,
    LifecycleConfig, OwnerAchievements, OwnerId, PetId, PetInfo, PetStore, Sequence,
    SequenceSource, Transition, Version, Versioned,
};
use petworld_journal::{Auditor, Journal};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Lifecycle service composing a store, a sequence source and a journal
///
/// ```
/// use petworld_core::{ActionKind, LedgerClock, MemoryStore, OwnerId};
/// use petworld_hub::Hub;
///
/// let hub = Hub::new(MemoryStore::new(), LedgerClock::new());
/// let minted = hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
///
/// hub.clock().advance(36);
/// let t = hub.apply_now(minted.pet.id, ActionKind::ForceUpdate).unwrap();
/// assert_eq!(t.pet.stage, petworld_core::Stage::Baby);
/// ```
pub struct Hub<S, C> {
    store: S,
    clock: C,
    rules: LifecycleConfig,
    registry: AchievementRegistry,
    config: HubConfig,
    journal: Option<Mutex<Journal>>,
    sweep: SweepState,
}

impl<S: PetStore, C: SequenceSource> Hub<S, C> {
    /// Create a hub with default rules, the builtin catalog and a journal
    pub fn new(store: S, clock: C) -> Self {
        Self::build(store, clock, Content::builtin())
    }

    /// Create a hub with the given content
    ///
    /// Fails if the rules are ones the state machine cannot honor.
    pub fn with_content(store: S, clock: C, content: Content) -> Result<Self> {
        content.validate()?;
        Ok(Self::build(store, clock, content))
    }

    fn build(store: S, clock: C, content: Content) -> Self {
        Self {
            store,
            clock,
            rules: content.rules,
            registry: content.achievements,
            config: HubConfig::default(),
            journal: Some(Mutex::new(Journal::new())),
            sweep: SweepState::new(),
        }
    }

    /// Create a hub with content loaded from a directory of RON files
    pub fn from_content_dir(store: S, clock: C, dir: impl AsRef<Path>) -> Result<Self> {
        let content = load_content(dir)?;
        tracing::info!(achievements = content.achievements.len(), "loaded lifecycle content");
        Self::with_content(store, clock, content)
    }

    /// Replace the hub configuration
    pub fn with_config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the journal
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(Mutex::new(journal));
        self
    }

    /// Run without a journal
    pub fn without_journal(mut self) -> Self {
        self.journal = None;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn rules(&self) -> &LifecycleConfig {
        &self.rules
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Set number of sweep workers, clamped to `[1, max_workers()]`
    pub fn set_worker_count(&mut self, n: usize) {
        self.config.set_worker_count(n);
    }

    /// Lock the journal, if the hub keeps one
    pub fn journal(&self) -> Option<MutexGuard<'_, Journal>> {
        self.journal
            .as_ref()
            .map(|journal| journal.lock().unwrap_or_else(PoisonError::into_inner))
    }

    // ========================================================================
    // Lifecycle API
    // ========================================================================

    /// Apply an action to a pet at `current` and persist the result
    ///
    /// A lost compare-and-set race reloads the pet and re-runs the whole
    /// transition, up to `conflict_retries` times.
    pub fn apply_action(
        &self,
        pet_id: PetId,
        kind: ActionKind,
        current: Sequence,
    ) -> Result<Transition> {
        self.retrying(pet_id, kind.name(), || self.try_apply(pet_id, &kind, current))
    }

    fn try_apply(
        &self,
        pet_id: PetId,
        kind: &ActionKind,
        current: Sequence,
    ) -> petworld_core::Result<Transition> {
        let loaded = self.store.require(pet_id)?;
        let owner = self.store.owner_achievements(&loaded.value.owner)?;
        let transition =
            lifecycle::transition(&loaded.value, kind, current, &owner.value, &self.rules)?;
        let version = self.commit(&transition, loaded.version, owner)?;
        tracing::debug!(pet = %pet_id, action = %kind, %current, %version, "committed");
        self.commit_events(&transition.events);
        Ok(transition)
    }

    /// Store the new pet, and the owner record too when something unlocked
    ///
    /// Checking the owner version makes a second unlock of the same
    /// achievement by another of the owner's pets lose the race.
    fn commit(
        &self,
        transition: &Transition,
        expected: Version,
        owner: Versioned<OwnerAchievements>,
    ) -> petworld_core::Result<Version> {
        let Versioned {
            value: mut record,
            version: owner_version,
        } = owner;
        if record.record(transition.unlocked()) {
            self.store
                .put_with_owner(&transition.pet, expected, &record, owner_version)
        } else {
            self.store.put(&transition.pet, expected)
        }
    }

    /// Run `op` until it succeeds, fails for good, or runs out of retries
    fn retrying<T>(
        &self,
        pet_id: PetId,
        op: &str,
        mut attempt_once: impl FnMut() -> petworld_core::Result<T>,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            match attempt_once() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.config.conflict_retries() => {
                    attempt += 1;
                    tracing::warn!(pet = %pet_id, op, attempt, "retrying after {}", err);
                }
                Err(err) => {
                    match &err {
                        CoreError::InvalidSequence { .. }
                        | CoreError::VersionConflict { .. }
                        | CoreError::OwnerConflict { .. } => {
                            tracing::warn!(pet = %pet_id, op, "{}", err)
                        }
                        _ => tracing::debug!(pet = %pet_id, op, "rejected: {}", err),
                    }
                    return Err(err.into());
                }
            }
        }
    }

    /// Apply an action at the current sequence
    pub fn apply_now(&self, pet_id: PetId, kind: ActionKind) -> Result<Transition> {
        self.apply_action(pet_id, kind, self.clock.current_sequence())
    }

    /// Mint a new pet at the current sequence
    pub fn mint(&self, owner: OwnerId, name: &str) -> Result<Transition> {
        self.mint_at(owner, name, self.clock.current_sequence())
    }

    /// Mint a new pet at `sequence`
    ///
    /// The first-pet achievement goes to owners who have not earned it yet.
    pub fn mint_at(&self, owner: OwnerId, name: &str, sequence: Sequence) -> Result<Transition> {
        lifecycle::validate_name(name, &self.rules.mint)?;
        let id = self.store.allocate_id()?;
        let transition = self.retrying(id, "mint", || {
            let record = self.store.owner_achievements(&owner)?;
            let transition = lifecycle::mint(id, &record.value, name, sequence, &self.rules)?;
            self.commit(&transition, Version::NONE, record)?;
            Ok(transition)
        })?;
        tracing::info!(pet = %id, owner = %transition.pet.owner, name, %sequence, "minted");
        self.commit_events(&transition.events);
        Ok(transition)
    }

    /// Hand a pet from `from` to `to`
    ///
    /// Fails with `NotOwner` unless `from` holds the pet. Only the owner
    /// binding changes: the pet keeps its badges and both owners keep
    /// their earned records.
    pub fn transfer(&self, pet_id: PetId, from: &OwnerId, to: OwnerId) -> Result<Transition> {
        let current = self.clock.current_sequence();
        let transition = self.retrying(pet_id, "transfer", || {
            let loaded = self.store.require(pet_id)?;
            let transition = lifecycle::transfer(&loaded.value, from, to.clone(), current)?;
            if !transition.events.is_empty() {
                self.store.put(&transition.pet, loaded.version)?;
            }
            Ok(transition)
        })?;
        self.commit_events(&transition.events);
        Ok(transition)
    }

    /// A pet with derived values at the current sequence
    pub fn pet_info(&self, pet_id: PetId) -> Result<PetInfo> {
        let loaded = self.store.require(pet_id)?;
        Ok(loaded.value.info(self.clock.current_sequence()))
    }

    /// Ids of an owner's pets
    pub fn pets_of(&self, owner: &OwnerId) -> Result<Vec<PetId>> {
        Ok(self
            .store
            .pets_of(owner)?
            .into_iter()
            .map(|pet| pet.id)
            .collect())
    }

    /// Everything an owner has earned, in unlock order
    pub fn owner_achievements(&self, owner: &OwnerId) -> Result<OwnerAchievements> {
        Ok(self.store.owner_achievements(owner)?.value)
    }

    pub fn has_earned(&self, owner: &OwnerId, achievement: Achievement) -> Result<bool> {
        Ok(self.owner_achievements(owner)?.has_earned(achievement))
    }

    /// Number of distinct achievements an owner has earned
    pub fn achievement_count(&self, owner: &OwnerId) -> Result<usize> {
        Ok(self.owner_achievements(owner)?.count())
    }

    /// Badges carried by one pet, in unlock order
    pub fn pet_achievements(&self, pet_id: PetId) -> Result<Vec<Achievement>> {
        let loaded = self.store.require(pet_id)?;
        Ok(loaded.value.achievements.iter().copied().collect())
    }

    /// Bring each listed pet up to the current sequence
    ///
    /// Unknown ids are skipped. Any other failure stops the batch; pets
    /// updated before it stay updated.
    pub fn batch_update(&self, ids: &[PetId]) -> Result<Vec<Transition>> {
        let current = self.clock.current_sequence();
        let mut updated = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.apply_action(id, ActionKind::ForceUpdate, current) {
                Ok(transition) => updated.push(transition),
                Err(crate::Error::Core(CoreError::NotFound(_))) => {
                    tracing::debug!(pet = %id, "batch update skipped unknown pet");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(updated)
    }

    /// The achievement catalog with holder counts from the journal
    pub fn achievements(&self) -> AchievementRegistry {
        match self.journal() {
            Some(journal) => self.registry.with_totals(journal.unlock_totals()),
            None => self.registry.clone(),
        }
    }

    /// Unlock counts recomputed from the retained journal entries
    pub fn audited_achievements(&self) -> AchievementRegistry {
        match self.journal() {
            Some(journal) => self
                .registry
                .with_totals(&Auditor::new(&journal).achievement_totals()),
            None => self.registry.clone(),
        }
    }

    fn commit_events(&self, events: &[Event]) {
        for event in events {
            match &event.kind {
                EventKind::StatsChanged { before, after } => tracing::debug!(
                    pet = %event.pet,
                    happiness = %after.happiness,
                    hunger = %after.hunger,
                    health = %after.health,
                    "stats changed from {}/{}/{}",
                    before.happiness,
                    before.hunger,
                    before.health
                ),
                EventKind::Evolved { from, to } => {
                    tracing::info!(pet = %event.pet, %from, %to, "evolved")
                }
                EventKind::Died => tracing::info!(pet = %event.pet, "died"),
                EventKind::Revived => tracing::info!(pet = %event.pet, "revived"),
                EventKind::AchievementUnlocked(achievement) => {
                    tracing::info!(pet = %event.pet, %achievement, "achievement unlocked")
                }
                EventKind::Transferred { from, to } => {
                    tracing::info!(pet = %event.pet, %from, %to, "transferred")
                }
                EventKind::Minted => {}
            }
        }

        if let Some(mut journal) = self.journal() {
            journal.record_all(events);
        }
    }

    // ========================================================================
    // Sweep API
    // ========================================================================

    /// Mark the surface visible or hidden; hidden hubs skip sweeps
    pub fn set_visible(&self, visible: bool) {
        self.sweep.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.sweep.is_visible()
    }

    /// When the last sweep completed
    pub fn last_sweep(&self) -> Option<Instant> {
        self.sweep.last_completed()
    }

    /// Sweep now unless hidden or already sweeping
    pub fn sweep(&self) -> Result<SweepOutcome> {
        self.sweep_at(Instant::now())
    }

    /// Sweep if the sweep interval has passed since the last sweep
    pub fn sweep_if_due(&self, now: Instant) -> Result<SweepOutcome> {
        if !self.sweep.is_visible() {
            return Ok(SweepOutcome::Hidden);
        }
        if !self.sweep.is_due(now, self.config.sweep_interval()) {
            return Ok(SweepOutcome::NotDue);
        }
        self.sweep_at(now)
    }

    fn sweep_at(&self, now: Instant) -> Result<SweepOutcome> {
        if !self.sweep.is_visible() {
            tracing::debug!("sweep skipped: hidden");
            return Ok(SweepOutcome::Hidden);
        }
        let Some(_guard) = self.sweep.try_begin() else {
            tracing::debug!("sweep skipped: in flight");
            return Ok(SweepOutcome::InFlight);
        };

        let ids = self.store.pet_ids()?;
        let current = self.clock.current_sequence();
        let report = self.sweep_pets(&ids, current);
        self.sweep.complete(now);
        if let Some(mut journal) = self.journal() {
            journal.record_metadata(current, "sweep", report.summary());
        }

        if !report.failures.is_empty() {
            tracing::warn!(failures = report.failures.len(), "sweep had per-pet failures");
        }
        tracing::info!(
            %current,
            pets = ids.len(),
            updated = report.updated,
            died = report.died.len(),
            evolved = report.evolved.len(),
            "sweep completed"
        );
        Ok(SweepOutcome::Completed(report))
    }

    fn sweep_pets(&self, ids: &[PetId], current: Sequence) -> SweepReport {
        let workers = self.config.worker_count().min(ids.len()).max(1);
        let sweep_chunk = |chunk: &[PetId]| {
            let mut report = SweepReport::new(current);
            for &id in chunk {
                report.record(id, self.apply_action(id, ActionKind::ForceUpdate, current));
            }
            report
        };

        if workers == 1 {
            return sweep_chunk(ids);
        }

        let chunk_size = ids.len().div_ceil(workers);
        let mut report = SweepReport::new(current);
        std::thread::scope(|scope| {
            let handles: Vec<_> = ids
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || sweep_chunk(chunk)))
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(part) => report.merge(part),
                    Err(_) => tracing::warn!("sweep worker panicked"),
                }
            }
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use petworld_core::{LedgerClock, MemoryStore, Pet, Stage, StatDelta, Stats};
    use petworld_journal::JournalConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn hub() -> Hub<MemoryStore, LedgerClock> {
        init_tracing();
        Hub::new(MemoryStore::new(), LedgerClock::new())
    }

    fn core_err(err: Error) -> CoreError {
        match err {
            Error::Core(err) => err,
            other => panic!("unexpected error: {}", other),
        }
    }

    /// Simulates another writer committing just before each of the next
    /// `conflicts` updates
    struct RacingStore {
        inner: MemoryStore,
        conflicts: AtomicU32,
    }

    impl RacingStore {
        fn new(conflicts: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                conflicts: AtomicU32::new(conflicts),
            }
        }

        /// Commit a rewrite of the stored pet if a race is still pending
        fn race(&self, pet: &Pet, expected: Version) -> petworld_core::Result<()> {
            let race = expected != Version::NONE
                && self
                    .conflicts
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
            if race {
                let current = self.inner.require(pet.id)?;
                self.inner.put(&current.value, current.version)?;
            }
            Ok(())
        }
    }

    impl PetStore for RacingStore {
        fn allocate_id(&self) -> petworld_core::Result<PetId> {
            self.inner.allocate_id()
        }

        fn get(&self, id: PetId) -> petworld_core::Result<Option<Versioned<Pet>>> {
            self.inner.get(id)
        }

        fn put(&self, pet: &Pet, expected: Version) -> petworld_core::Result<Version> {
            self.race(pet, expected)?;
            self.inner.put(pet, expected)
        }

        fn pet_ids(&self) -> petworld_core::Result<Vec<PetId>> {
            self.inner.pet_ids()
        }

        fn pets_of(&self, owner: &OwnerId) -> petworld_core::Result<Vec<Pet>> {
            self.inner.pets_of(owner)
        }

        fn owner_achievements(
            &self,
            owner: &OwnerId,
        ) -> petworld_core::Result<Versioned<OwnerAchievements>> {
            self.inner.owner_achievements(owner)
        }

        fn put_with_owner(
            &self,
            pet: &Pet,
            expected: Version,
            owner: &OwnerAchievements,
            owner_expected: Version,
        ) -> petworld_core::Result<Version> {
            self.race(pet, expected)?;
            self.inner
                .put_with_owner(pet, expected, owner, owner_expected)
        }
    }

    #[test]
    fn test_mint_awards_first_pet_per_owner() {
        let hub = hub();
        let first = hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
        let second = hub.mint(OwnerId::new("alice"), "Tofu").unwrap();
        let other = hub.mint(OwnerId::new("bob"), "Bean").unwrap();

        assert!(first.pet.has_achievement(Achievement::FirstPet));
        assert!(second.pet.achievements.is_empty());
        assert!(other.pet.has_achievement(Achievement::FirstPet));

        assert_eq!(
            hub.pets_of(&OwnerId::new("alice")).unwrap(),
            vec![first.pet.id, second.pet.id]
        );
        assert_eq!(hub.store().require(first.pet.id).unwrap().value, first.pet);
    }

    #[test]
    fn test_mint_rejects_bad_name() {
        let hub = hub();
        let err = hub.mint(OwnerId::new("alice"), "").unwrap_err();
        assert!(matches!(core_err(err), CoreError::InvalidName(_)));
        assert!(hub.store().pet_ids().unwrap().is_empty());
    }

    #[test]
    fn test_apply_action_persists() {
        let hub = hub();
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        // 600 units: hunger +20, happiness -10
        let fed = hub.apply_action(id, ActionKind::Feed, 600).unwrap();
        assert_eq!(fed.pet.stats, Stats::new(100, 0, 100));
        assert_eq!(fed.pet.feed_count, 1);
        assert_eq!(fed.pet.last_update_sequence, 600);

        let stored = hub.store().require(id).unwrap();
        assert_eq!(stored.value, fed.pet);
        assert_eq!(stored.version, Version(2));
    }

    #[test]
    fn test_unknown_pet() {
        let hub = hub();
        let err = hub.apply_action(PetId::new(42), ActionKind::Feed, 0).unwrap_err();
        assert_eq!(core_err(err), CoreError::NotFound(PetId::new(42)));
        assert!(hub.pet_info(PetId::new(42)).is_err());
    }

    #[test]
    fn test_sequence_going_backwards() {
        let hub = hub();
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;
        hub.apply_action(id, ActionKind::ForceUpdate, 100).unwrap();

        let err = hub.apply_action(id, ActionKind::Feed, 50).unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(core_err(err), CoreError::InvalidSequence { .. }));
    }

    #[test]
    fn test_death_is_all_or_nothing() {
        let hub = hub();
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        let died = hub
            .apply_action(id, ActionKind::ApplyEffects(StatDelta::new(0, 0, -100)), 0)
            .unwrap();
        assert!(!died.pet.alive);
        let version = hub.store().require(id).unwrap().version;

        let err = hub.apply_action(id, ActionKind::Feed, 10).unwrap_err();
        assert_eq!(core_err(err), CoreError::DeadPet(id));
        assert_eq!(hub.store().require(id).unwrap().version, version);

        let revived = hub.apply_action(id, ActionKind::Revive, 20).unwrap();
        assert!(revived.pet.alive);
        assert_eq!(revived.pet.stats, Stats::new(30, 50, 50));
        assert!(revived.pet.has_achievement(Achievement::SurvivedDeath));

        let err = hub.apply_action(id, ActionKind::Revive, 30).unwrap_err();
        assert_eq!(core_err(err), CoreError::NotDead(id));
    }

    #[test]
    fn test_conflict_retried_once() {
        init_tracing();
        let hub = Hub::new(RacingStore::new(1), LedgerClock::new());
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        let fed = hub.apply_action(id, ActionKind::Feed, 0).unwrap();
        assert_eq!(fed.pet.feed_count, 1);
        // mint, the racing rewrite, then our retried write
        assert_eq!(hub.store().require(id).unwrap().version, Version(3));
    }

    #[test]
    fn test_conflict_surfaced_after_retry() {
        init_tracing();
        let hub = Hub::new(RacingStore::new(2), LedgerClock::new());
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        let err = hub.apply_action(id, ActionKind::Feed, 0).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(core_err(err), CoreError::VersionConflict { .. }));
        assert_eq!(hub.store().require(id).unwrap().value.feed_count, 0);
    }

    #[test]
    fn test_no_retry_when_disabled() {
        init_tracing();
        let mut config = HubConfig::default();
        config.set_conflict_retries(0);
        let hub = Hub::new(RacingStore::new(1), LedgerClock::new()).with_config(config);
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        assert!(hub.apply_action(id, ActionKind::Feed, 0).is_err());
        assert!(hub.apply_action(id, ActionKind::Feed, 0).is_ok());
    }

    #[test]
    fn test_concurrent_feeds_are_serialized() {
        let hub = hub();
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| hub.apply_action(id, ActionKind::Feed, 0)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("feeder thread panicked"))
                .collect()
        });

        let successes = results.iter().filter(|r| r.is_ok()).count() as u64;
        assert!(successes >= 1);
        for err in results.into_iter().filter_map(|r| r.err()) {
            assert!(err.is_retryable());
        }
        assert_eq!(hub.store().require(id).unwrap().value.feed_count, successes);
    }

    #[test]
    fn test_batch_update_skips_unknown() {
        let hub = hub();
        let a = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;
        let b = hub.mint(OwnerId::new("bob"), "Tofu").unwrap().pet.id;
        hub.clock().advance(40);

        let updated = hub.batch_update(&[a, PetId::new(99), b]).unwrap();
        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|t| t.pet.stage == Stage::Baby));
        assert!(updated.iter().all(|t| t.pet.last_update_sequence == 40));
    }

    #[test]
    fn test_pet_info() {
        let hub = hub();
        hub.clock().set(10);
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;
        hub.clock().advance(25);

        let info = hub.pet_info(id).unwrap();
        assert_eq!(info.age, 25);
        assert_eq!(info.sequences_since_update, 25);
        assert_eq!(info.pet.birth_sequence, 10);
    }

    #[test]
    fn test_achievement_totals_from_journal() {
        let hub = hub();
        hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
        hub.mint(OwnerId::new("bob"), "Tofu").unwrap();
        hub.mint(OwnerId::new("bob"), "Bean").unwrap();

        let registry = hub.achievements();
        assert_eq!(registry.get(Achievement::FirstPet).unwrap().total_earned, 2);
        assert_eq!(registry.get(Achievement::FinalEvolution).unwrap().total_earned, 0);
        assert_eq!(registry.len(), 8);

        let audited = hub.audited_achievements();
        assert_eq!(audited.get(Achievement::FirstPet).unwrap().total_earned, 2);

        let journal = hub.journal().unwrap();
        assert_eq!(journal.stats().event_count, 5);
    }

    #[test]
    fn test_without_journal() {
        init_tracing();
        let hub = Hub::new(MemoryStore::new(), LedgerClock::new()).without_journal();
        hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
        assert!(hub.journal().is_none());
        assert_eq!(hub.achievements().get(Achievement::FirstPet).unwrap().total_earned, 0);
    }

    #[test]
    fn test_bounded_journal_keeps_totals() {
        init_tracing();
        let journal = Journal::with_config(JournalConfig {
            recording_enabled: true,
            max_entries: 1,
        });
        let hub = Hub::new(MemoryStore::new(), LedgerClock::new()).with_journal(journal);
        hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
        hub.mint(OwnerId::new("bob"), "Tofu").unwrap();

        assert_eq!(hub.achievements().get(Achievement::FirstPet).unwrap().total_earned, 2);
        assert_eq!(hub.journal().unwrap().entries().len(), 1);
    }

    #[test]
    fn test_sweep_resolves_decay() {
        let hub = hub();
        let starving = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;
        hub.clock().set(5000);
        let young = hub.mint(OwnerId::new("bob"), "Tofu").unwrap().pet.id;

        // Starving from 3000 units after birth, dead at 6000
        hub.clock().set(6000);
        let outcome = hub.sweep().unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.sequence, 6000);
        assert_eq!(report.updated, 2);
        assert_eq!(report.died, vec![starving]);
        assert!(report.failures.is_empty());
        assert!(hub.last_sweep().is_some());

        assert!(!hub.store().require(starving).unwrap().value.alive);
        let young = hub.store().require(young).unwrap().value;
        assert!(young.alive);
        assert_eq!(young.last_update_sequence, 6000);
    }

    #[test]
    fn test_sweep_evolves() {
        let hub = hub();
        let id = hub.mint(OwnerId::new("alice"), "Mochi").unwrap().pet.id;
        hub.clock().advance(36);

        let outcome = hub.sweep().unwrap();
        assert_eq!(outcome.report().unwrap().evolved, vec![id]);
        assert_eq!(hub.pet_info(id).unwrap().pet.stage, Stage::Baby);
    }

    #[test]
    fn test_sweep_skipped_when_hidden() {
        let hub = hub();
        hub.set_visible(false);
        assert!(matches!(hub.sweep().unwrap(), SweepOutcome::Hidden));
        assert!(matches!(
            hub.sweep_if_due(Instant::now()).unwrap(),
            SweepOutcome::Hidden
        ));
        assert!(hub.last_sweep().is_none());

        hub.set_visible(true);
        assert!(hub.sweep().unwrap().is_completed());
    }

    #[test]
    fn test_sweep_skipped_when_in_flight() {
        let hub = hub();
        let guard = hub.sweep.try_begin().unwrap();
        assert!(matches!(hub.sweep().unwrap(), SweepOutcome::InFlight));
        assert!(matches!(
            hub.sweep_if_due(Instant::now()).unwrap(),
            SweepOutcome::InFlight
        ));
        drop(guard);
        assert!(hub.sweep().unwrap().is_completed());
    }

    #[test]
    fn test_sweep_if_due() {
        let hub = hub();
        let start = Instant::now();
        assert!(hub.sweep_if_due(start).unwrap().is_completed());
        assert!(matches!(
            hub.sweep_if_due(start + Duration::from_secs(10)).unwrap(),
            SweepOutcome::NotDue
        ));
        assert!(hub
            .sweep_if_due(start + Duration::from_secs(300))
            .unwrap()
            .is_completed());
    }

    #[test]
    fn test_parallel_sweep() {
        init_tracing();
        let hub = Hub::new(MemoryStore::new(), LedgerClock::new())
            .with_config(HubConfig::with_worker_count(4));
        let ids: Vec<_> = (0..20)
            .map(|i| {
                hub.mint(OwnerId::new(format!("owner{}", i)), "Mochi")
                    .unwrap()
                    .pet
                    .id
            })
            .collect();
        hub.clock().advance(36);

        let outcome = hub.sweep().unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.updated, 20);
        let mut evolved = report.evolved.clone();
        evolved.sort();
        assert_eq!(evolved, ids);
    }

    #[test]
    fn test_from_content_dir() {
        init_tracing();
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../content");
        let hub = Hub::from_content_dir(MemoryStore::new(), LedgerClock::new(), dir).unwrap();
        assert_eq!(hub.rules(), &LifecycleConfig::default());
        assert_eq!(
            hub.achievements().get(Achievement::FinalEvolution).unwrap().name,
            "Legend"
        );

        let missing = Hub::from_content_dir(MemoryStore::new(), LedgerClock::new(), "/nope");
        assert!(matches!(missing, Err(Error::Content(_))));
    }

    #[test]
    fn test_with_content_rejects_bad_rules() {
        init_tracing();
        let mut content = Content::builtin();
        content.rules.revival.health = 0;
        let hub = Hub::with_content(MemoryStore::new(), LedgerClock::new(), content);
        assert!(matches!(hub, Err(Error::Content(_))));

        assert!(Hub::with_content(MemoryStore::new(), LedgerClock::new(), Content::builtin()).is_ok());
    }

    #[test]
    fn test_achievement_earned_once_per_owner() {
        let hub = hub();
        let alice = OwnerId::new("alice");
        let mochi = hub.mint(alice.clone(), "Mochi").unwrap().pet.id;
        let tofu = hub.mint(alice.clone(), "Tofu").unwrap().pet.id;
        let bean = hub.mint(OwnerId::new("bob"), "Bean").unwrap().pet.id;
        hub.clock().advance(36);

        let first = hub.apply_now(mochi, ActionKind::ForceUpdate).unwrap();
        assert_eq!(first.unlocked().collect::<Vec<_>>(), vec![Achievement::FirstEvolution]);

        let second = hub.apply_now(tofu, ActionKind::ForceUpdate).unwrap();
        assert_eq!(second.pet.stage, Stage::Baby);
        assert_eq!(second.unlocked().count(), 0);
        assert!(!hub
            .pet_achievements(tofu)
            .unwrap()
            .contains(&Achievement::FirstEvolution));

        assert_eq!(
            hub.achievements().get(Achievement::FirstEvolution).unwrap().total_earned,
            1
        );
        assert!(hub.has_earned(&alice, Achievement::FirstEvolution).unwrap());
        assert_eq!(hub.achievement_count(&alice).unwrap(), 2);
        assert_eq!(
            hub.owner_achievements(&alice).unwrap().iter().collect::<Vec<_>>(),
            vec![Achievement::FirstPet, Achievement::FirstEvolution]
        );

        // Another owner earns it independently
        hub.apply_now(bean, ActionKind::ForceUpdate).unwrap();
        assert_eq!(
            hub.achievements().get(Achievement::FirstEvolution).unwrap().total_earned,
            2
        );
    }

    #[test]
    fn test_concurrent_hatching_unlocks_once() {
        init_tracing();
        let mut config = HubConfig::default();
        config.set_conflict_retries(4);
        let hub = Hub::new(MemoryStore::new(), LedgerClock::new()).with_config(config);
        let alice = OwnerId::new("alice");
        let ids: Vec<_> = (0..6)
            .map(|_| hub.mint(alice.clone(), "Mochi").unwrap().pet.id)
            .collect();
        hub.clock().advance(36);

        let hub = &hub;
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = ids
                .iter()
                .map(|&id| scope.spawn(move || hub.apply_now(id, ActionKind::ForceUpdate)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("hatching thread panicked"))
                .collect()
        });

        let unlocks = results
            .iter()
            .map(|r| r.as_ref().unwrap())
            .filter(|t| t.unlocked().any(|a| a == Achievement::FirstEvolution))
            .count();
        assert_eq!(unlocks, 1);
        assert_eq!(
            hub.achievements().get(Achievement::FirstEvolution).unwrap().total_earned,
            1
        );
    }

    #[test]
    fn test_concurrent_first_mints() {
        init_tracing();
        let mut config = HubConfig::default();
        config.set_conflict_retries(4);
        let hub = Hub::new(MemoryStore::new(), LedgerClock::new()).with_config(config);

        let minted: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| hub.mint(OwnerId::new("alice"), "Mochi")))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("minting thread panicked").unwrap())
                .collect()
        });

        let firsts = minted
            .iter()
            .filter(|t| t.pet.has_achievement(Achievement::FirstPet))
            .count();
        assert_eq!(firsts, 1);
        assert_eq!(hub.pets_of(&OwnerId::new("alice")).unwrap().len(), 8);
        assert_eq!(
            hub.achievements().get(Achievement::FirstPet).unwrap().total_earned,
            1
        );
    }

    #[test]
    fn test_transfer() {
        let hub = hub();
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");
        let mochi = hub.mint(alice.clone(), "Mochi").unwrap().pet.id;
        hub.mint(bob.clone(), "Bean").unwrap();

        let t = hub.transfer(mochi, &alice, bob.clone()).unwrap();
        assert_eq!(t.pet.owner, bob);
        assert_eq!(t.events.len(), 1);
        assert!(hub.pets_of(&alice).unwrap().is_empty());
        assert_eq!(hub.pets_of(&bob).unwrap().len(), 2);

        // Badges travel with the pet; earned records stay with the owner
        assert_eq!(hub.pet_achievements(mochi).unwrap(), vec![Achievement::FirstPet]);
        assert!(hub.has_earned(&alice, Achievement::FirstPet).unwrap());
        let again = hub.mint(alice.clone(), "Tofu").unwrap();
        assert!(again.pet.achievements.is_empty());

        let err = hub.transfer(mochi, &alice, bob.clone()).unwrap_err();
        assert!(matches!(core_err(err), CoreError::NotOwner { .. }));

        let version = hub.store().require(mochi).unwrap().version;
        let same = hub.transfer(mochi, &bob, bob.clone()).unwrap();
        assert!(same.events.is_empty());
        assert_eq!(hub.store().require(mochi).unwrap().version, version);

        let err = hub.transfer(PetId::new(99), &alice, bob).unwrap_err();
        assert_eq!(core_err(err), CoreError::NotFound(PetId::new(99)));

        let journal = hub.journal().unwrap();
        let summary = Auditor::new(&journal).pet_summary(mochi);
        assert_eq!(summary.transfers, 1);
    }

    #[test]
    fn test_transfer_retries_on_conflict() {
        init_tracing();
        let hub = Hub::new(RacingStore::new(1), LedgerClock::new());
        let alice = OwnerId::new("alice");
        let id = hub.mint(alice.clone(), "Mochi").unwrap().pet.id;

        hub.transfer(id, &alice, OwnerId::new("bob")).unwrap();
        assert_eq!(
            hub.store().require(id).unwrap().value.owner,
            OwnerId::new("bob")
        );
    }

    #[test]
    fn test_sweep_recorded_in_journal() {
        let hub = hub();
        hub.mint(OwnerId::new("alice"), "Mochi").unwrap();
        hub.clock().advance(36);
        hub.sweep().unwrap();

        let journal = hub.journal().unwrap();
        let auditor = Auditor::new(&journal);
        let metadata = auditor.metadata();
        assert_eq!(
            metadata,
            vec![("sweep", "updated=1 evolved=1 died=0 failures=0", 36)]
        );
    }

    #[test]
    fn test_with_db_store() {
        init_tracing();
        let store = petworld_db::DbStore::in_memory().unwrap();
        let hub = Hub::new(store, LedgerClock::new());
        let id = hub.mint(OwnerId::new("0xabc"), "Mochi").unwrap().pet.id;

        hub.clock().advance(36);
        let t = hub.apply_now(id, ActionKind::ForceUpdate).unwrap();
        assert_eq!(t.pet.stage, Stage::Baby);
        assert_eq!(hub.store().require(id).unwrap().value, t.pet);

        let died = hub
            .apply_now(id, ActionKind::ApplyEffects(StatDelta::new(0, 0, -100)))
            .unwrap();
        assert!(!died.pet.alive);
        assert_eq!(hub.store().dead_pets().unwrap().len(), 1);

        let revived = hub.apply_now(id, ActionKind::Revive).unwrap();
        assert!(revived.pet.alive);
        assert_eq!(hub.pets_of(&OwnerId::new("0xabc")).unwrap(), vec![id]);

        let second = hub.mint(OwnerId::new("0xabc"), "Tofu").unwrap().pet.id;
        hub.clock().advance(36);
        let hatched = hub.apply_now(second, ActionKind::ForceUpdate).unwrap();
        assert_eq!(hatched.pet.stage, Stage::Baby);
        assert_eq!(hatched.unlocked().count(), 0);

        hub.transfer(second, &OwnerId::new("0xabc"), OwnerId::new("0xdef"))
            .unwrap();
        assert_eq!(hub.pets_of(&OwnerId::new("0xdef")).unwrap(), vec![second]);
        assert!(hub
            .has_earned(&OwnerId::new("0xabc"), Achievement::SurvivedDeath)
            .unwrap());
        assert_eq!(hub.achievement_count(&OwnerId::new("0xdef")).unwrap(), 0);
    }
}
