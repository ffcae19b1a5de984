//! Versioned pet storage
//!
//! Every record carries a [`Version`] that advances on each write. A writer
//! passes the version it loaded; if the stored record has moved on, the write
//! fails with [`Error::VersionConflict`] and nothing is stored. This makes
//! concurrent transitions of the same pet serializable without holding a lock
//! across the transition itself.
//!
//! Owner achievement records are versioned the same way. A transition that
//! unlocks something writes the pet and the owner record together, so two
//! pets of one owner cannot both claim the same achievement.

use crate::{Error, OwnerAchievements, OwnerId, Pet, PetId, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Record version for optimistic concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl Version {
    /// Version of a record that does not exist yet
    pub const NONE: Version = Version(0);

    pub fn next(self) -> Version {
        Version(self.0.saturating_add(1))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A value together with the version it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: Version) -> Self {
        Self { value, version }
    }
}

/// Storage backend for pet records
pub trait PetStore: Send + Sync {
    /// Reserve a fresh pet id
    fn allocate_id(&self) -> Result<PetId>;

    /// Load a pet with its current version
    fn get(&self, id: PetId) -> Result<Option<Versioned<Pet>>>;

    /// Store `pet` if the stored version still equals `expected`
    ///
    /// Pass [`Version::NONE`] to create. Returns the new version.
    fn put(&self, pet: &Pet, expected: Version) -> Result<Version>;

    /// All pet ids, in creation order
    fn pet_ids(&self) -> Result<Vec<PetId>>;

    /// All pets owned by `owner`
    fn pets_of(&self, owner: &OwnerId) -> Result<Vec<Pet>>;

    /// The achievements `owner` has earned
    ///
    /// An owner with no stored record gets an empty one at [`Version::NONE`].
    fn owner_achievements(&self, owner: &OwnerId) -> Result<Versioned<OwnerAchievements>>;

    /// Store `pet` and the owner record in one atomic write
    ///
    /// Each is checked against its own expected version; if either is stale
    /// nothing is stored. Returns the pet's new version.
    fn put_with_owner(
        &self,
        pet: &Pet,
        expected: Version,
        owner: &OwnerAchievements,
        owner_expected: Version,
    ) -> Result<Version>;

    /// Load a pet or fail with [`Error::NotFound`]
    fn require(&self, id: PetId) -> Result<Versioned<Pet>> {
        self.get(id)?.ok_or(Error::NotFound(id))
    }
}

/// Compare-and-set check shared by store implementations
pub fn check_version(pet: PetId, expected: Version, actual: Version) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::VersionConflict {
            pet,
            expected,
            actual,
        })
    }
}

/// Compare-and-set check for owner records
pub fn check_owner_version(owner: &OwnerId, expected: Version, actual: Version) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::OwnerConflict {
            owner: owner.clone(),
            expected,
            actual,
        })
    }
}

#[derive(Debug, Default)]
struct Records {
    pets: IndexMap<PetId, Versioned<Pet>>,
    owners: IndexMap<OwnerId, Versioned<OwnerAchievements>>,
}

impl Records {
    fn pet_version(&self, id: PetId) -> Version {
        self.pets.get(&id).map_or(Version::NONE, |v| v.version)
    }

    fn owner_version(&self, owner: &OwnerId) -> Version {
        self.owners.get(owner).map_or(Version::NONE, |v| v.version)
    }
}

/// In-memory store, for tests and single-process use
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pets
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .pets
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("memory store lock poisoned".to_string())
}

impl PetStore for MemoryStore {
    fn allocate_id(&self) -> Result<PetId> {
        Ok(PetId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn get(&self, id: PetId) -> Result<Option<Versioned<Pet>>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.pets.get(&id).cloned())
    }

    fn put(&self, pet: &Pet, expected: Version) -> Result<Version> {
        let mut records = self.records.write().map_err(poisoned)?;
        let actual = records.pet_version(pet.id);
        check_version(pet.id, expected, actual)?;

        let version = actual.next();
        records.pets.insert(pet.id, Versioned::new(pet.clone(), version));
        Ok(version)
    }

    fn pet_ids(&self) -> Result<Vec<PetId>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.pets.keys().copied().collect())
    }

    fn pets_of(&self, owner: &OwnerId) -> Result<Vec<Pet>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .pets
            .values()
            .filter(|v| &v.value.owner == owner)
            .map(|v| v.value.clone())
            .collect())
    }

    fn owner_achievements(&self, owner: &OwnerId) -> Result<Versioned<OwnerAchievements>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.owners.get(owner).cloned().unwrap_or_else(|| {
            Versioned::new(OwnerAchievements::new(owner.clone()), Version::NONE)
        }))
    }

    fn put_with_owner(
        &self,
        pet: &Pet,
        expected: Version,
        owner: &OwnerAchievements,
        owner_expected: Version,
    ) -> Result<Version> {
        let mut records = self.records.write().map_err(poisoned)?;
        let actual = records.pet_version(pet.id);
        check_version(pet.id, expected, actual)?;
        let owner_actual = records.owner_version(&owner.owner);
        check_owner_version(&owner.owner, owner_expected, owner_actual)?;

        let version = actual.next();
        records.pets.insert(pet.id, Versioned::new(pet.clone(), version));
        records.owners.insert(
            owner.owner.clone(),
            Versioned::new(owner.clone(), owner_actual.next()),
        );
        Ok(version)
    }
}
