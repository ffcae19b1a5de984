//! Common query patterns for the database.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::DbStore;
use petworld_core::{Pet, Stage};

impl DbStore {
    /// Get all pets of a specific owner.
    pub fn pets_by_owner(&self, owner: &str) -> Result<Vec<Pet>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredPet>(StoredPetKey::owner)?;
        let iter = scan.start_with(owner)?;
        let pets: std::result::Result<Vec<StoredPet>, _> = iter.collect();
        let pets = pets.map_err(|e| Error::Database(e.to_string()))?;
        // The scan matches by prefix
        pets.into_iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.to_pet())
            .collect()
    }

    /// Count pets of a specific owner.
    pub fn count_pets_by_owner(&self, owner: &str) -> Result<usize> {
        Ok(self.pets_by_owner(owner)?.len())
    }

    /// Get all dead pets.
    pub fn dead_pets(&self) -> Result<Vec<Pet>> {
        self.all_stored()?
            .into_iter()
            .filter(|p| !p.alive)
            .map(|p| p.to_pet())
            .collect()
    }

    /// Get all pets at a stage.
    pub fn pets_at_stage(&self, stage: Stage) -> Result<Vec<Pet>> {
        self.all_stored()?
            .into_iter()
            .filter(|p| p.stage == stage.rank())
            .map(|p| p.to_pet())
            .collect()
    }
}
