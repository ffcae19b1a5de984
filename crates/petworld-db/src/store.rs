//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::*;
use petworld_core::{OwnerAchievements, OwnerId, Pet, PetId, PetStore, Version, Versioned};
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models
        .define::<StoredPet>()
        .expect("StoredPet model definition");
    models
        .define::<StoredCounter>()
        .expect("StoredCounter model definition");
    models
        .define::<StoredOwner>()
        .expect("StoredOwner model definition");
    models
});

/// Database store for persistent pet records.
pub struct DbStore {
    pub(crate) db: Database<'static>,
}

impl DbStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Reserve the next pet id.
    pub fn next_pet_id(&self) -> Result<PetId> {
        let rw = self.db.rw_transaction()?;
        let current: Option<StoredCounter> = rw.get().primary(PET_ID_COUNTER.to_string())?;
        let next = current.map_or(0, |c| c.value) + 1;
        rw.upsert(StoredCounter::new(PET_ID_COUNTER, next))?;
        rw.commit()?;
        Ok(PetId::new(next))
    }

    /// Load a pet with its version.
    pub fn load_pet(&self, id: PetId) -> Result<Option<Versioned<Pet>>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredPet> = r.get().primary(id.raw())?;
        stored
            .map(|s| Ok(Versioned::new(s.to_pet()?, s.version())))
            .transpose()
    }

    /// Save a pet if its stored version equals `expected`.
    ///
    /// The version check and the write share one transaction, so two writers
    /// holding the same version cannot both succeed.
    pub fn save_pet(&self, pet: &Pet, expected: Version) -> Result<Version> {
        let rw = self.db.rw_transaction()?;
        let version = Self::write_pet(&rw, pet, expected)?;
        rw.commit()?;
        Ok(version)
    }

    /// Load the achievements an owner has earned.
    pub fn load_owner(&self, owner: &OwnerId) -> Result<Option<Versioned<OwnerAchievements>>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredOwner> = r.get().primary(owner.as_str().to_string())?;
        stored
            .map(|s| Ok(Versioned::new(s.to_record()?, s.version())))
            .transpose()
    }

    /// Save a pet and its owner's record in one transaction.
    ///
    /// Both versions are checked before either row is written.
    pub fn save_pet_with_owner(
        &self,
        pet: &Pet,
        expected: Version,
        owner: &OwnerAchievements,
        owner_expected: Version,
    ) -> Result<Version> {
        let rw = self.db.rw_transaction()?;
        let version = Self::write_pet(&rw, pet, expected)?;

        let stored: Option<StoredOwner> = rw.get().primary(owner.owner.as_str().to_string())?;
        let actual = stored.as_ref().map_or(Version::NONE, StoredOwner::version);
        if actual != owner_expected {
            tracing::debug!(owner = %owner.owner, expected = %owner_expected, %actual, "rejecting stale owner write");
            return Err(Error::OwnerConflict {
                owner: owner.owner.clone(),
                expected: owner_expected,
                actual,
            });
        }
        let row = StoredOwner::from_record(owner, actual.next())?;
        match stored {
            Some(old) => rw.update(old, row)?,
            None => rw.insert(row)?,
        }

        rw.commit()?;
        Ok(version)
    }

    fn write_pet(rw: &transaction::RwTransaction<'_>, pet: &Pet, expected: Version) -> Result<Version> {
        let stored: Option<StoredPet> = rw.get().primary(pet.id.raw())?;
        let actual = stored.as_ref().map_or(Version::NONE, StoredPet::version);
        if actual != expected {
            tracing::debug!(pet = %pet.id, %expected, %actual, "rejecting stale write");
            return Err(Error::VersionConflict {
                pet: pet.id,
                expected,
                actual,
            });
        }

        let version = actual.next();
        let row = StoredPet::from_pet(pet, version)?;
        // update() re-indexes the owner key when a pet changes hands
        match stored {
            Some(old) => rw.update(old, row)?,
            None => rw.insert(row)?,
        }
        Ok(version)
    }

    /// Load all pets.
    pub fn load_all_pets(&self) -> Result<Vec<Pet>> {
        self.all_stored()?.iter().map(StoredPet::to_pet).collect()
    }

    pub(crate) fn all_stored(&self) -> Result<Vec<StoredPet>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredPet>()?;
        let iter = scan.all()?;
        let pets: std::result::Result<Vec<StoredPet>, _> = iter.collect();
        pets.map_err(|e| Error::Database(e.to_string()))
    }

}

impl PetStore for DbStore {
    fn allocate_id(&self) -> petworld_core::Result<PetId> {
        Ok(self.next_pet_id()?)
    }

    fn get(&self, id: PetId) -> petworld_core::Result<Option<Versioned<Pet>>> {
        Ok(self.load_pet(id)?)
    }

    fn put(&self, pet: &Pet, expected: Version) -> petworld_core::Result<Version> {
        Ok(self.save_pet(pet, expected)?)
    }

    fn pet_ids(&self) -> petworld_core::Result<Vec<PetId>> {
        Ok(self
            .all_stored()?
            .into_iter()
            .map(|s| PetId::new(s.id))
            .collect())
    }

    fn pets_of(&self, owner: &OwnerId) -> petworld_core::Result<Vec<Pet>> {
        Ok(self.pets_by_owner(owner.as_str())?)
    }

    fn owner_achievements(
        &self,
        owner: &OwnerId,
    ) -> petworld_core::Result<Versioned<OwnerAchievements>> {
        Ok(self.load_owner(owner)?.unwrap_or_else(|| {
            Versioned::new(OwnerAchievements::new(owner.clone()), Version::NONE)
        }))
    }

    fn put_with_owner(
        &self,
        pet: &Pet,
        expected: Version,
        owner: &OwnerAchievements,
        owner_expected: Version,
    ) -> petworld_core::Result<Version> {
        Ok(self.save_pet_with_owner(pet, expected, owner, owner_expected)?)
    }
}
