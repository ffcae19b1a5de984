//! Pet record model.

use super::{decode_achievements, encode_achievements};
use crate::error::{Error, Result};
use native_db::*;
use native_model::{native_model, Model};
use petworld_core::{OwnerId, Pet, PetId, Stage, Stats, Version};
use serde::{Deserialize, Serialize};

/// Stored pet in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredPet {
    /// Primary key - pet ID.
    #[primary_key]
    pub id: u64,
    /// Owner address.
    #[secondary_key]
    pub owner: String,
    /// Record version for compare-and-set writes.
    pub version: u64,
    pub name: String,
    /// Stage rank (0 = egg).
    pub stage: u8,
    pub happiness: u32,
    pub hunger: u32,
    pub health: u32,
    pub birth_sequence: u64,
    pub last_update_sequence: u64,
    pub alive: bool,
    pub died_at: Option<u64>,
    pub feed_count: u64,
    pub play_count: u64,
    /// Serialized achievement ids, in unlock order.
    pub achievements: Vec<u8>,
}

impl StoredPet {
    /// Create from a pet at the version it will be stored as.
    pub fn from_pet(pet: &Pet, version: Version) -> Result<Self> {
        let achievements = encode_achievements(pet.achievements.iter().copied())?;
        Ok(Self {
            id: pet.id.raw(),
            owner: pet.owner.as_str().to_string(),
            version: version.raw(),
            name: pet.name.clone(),
            stage: pet.stage.rank(),
            happiness: pet.stats.happiness.get(),
            hunger: pet.stats.hunger.get(),
            health: pet.stats.health.get(),
            birth_sequence: pet.birth_sequence,
            last_update_sequence: pet.last_update_sequence,
            alive: pet.alive,
            died_at: pet.died_at,
            feed_count: pet.feed_count,
            play_count: pet.play_count,
            achievements,
        })
    }

    /// Convert to a pet.
    pub fn to_pet(&self) -> Result<Pet> {
        let stage = Stage::from_rank(self.stage)
            .ok_or_else(|| Error::InvalidRecord(format!("pet {}: stage {}", self.id, self.stage)))?;

        let achievements = decode_achievements(&self.achievements, &format!("pet {}", self.id))?;
        let mut pet = Pet::new(
            PetId::new(self.id),
            OwnerId::new(self.owner.clone()),
            self.name.clone(),
            self.birth_sequence,
        );
        for achievement in achievements {
            pet.award(achievement);
        }

        pet.stage = stage;
        pet.stats = Stats::new(self.happiness, self.hunger, self.health);
        pet.last_update_sequence = self.last_update_sequence;
        pet.alive = self.alive;
        pet.died_at = self.died_at;
        pet.feed_count = self.feed_count;
        pet.play_count = self.play_count;
        Ok(pet)
    }

    /// Stored version.
    pub fn version(&self) -> Version {
        Version(self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petworld_core::Achievement;

    #[test]
    fn test_stored_pet_preserves_record() {
        let mut pet = Pet::new(PetId::new(4), OwnerId::new("0xabc"), "Mochi", 12);
        pet.stage = Stage::Teen;
        pet.stats = Stats::new(61, 7, 88);
        pet.last_update_sequence = 400;
        pet.feed_count = 3;
        pet.award(Achievement::SecondEvolution);
        pet.award(Achievement::FirstPet);

        let stored = StoredPet::from_pet(&pet, Version(3)).unwrap();
        assert_eq!(stored.version(), Version(3));
        assert_eq!(stored.to_pet().unwrap(), pet);
    }

    #[test]
    fn test_corrupt_stage() {
        let pet = Pet::new(PetId::new(4), OwnerId::new("0xabc"), "Mochi", 0);
        let mut stored = StoredPet::from_pet(&pet, Version(1)).unwrap();
        stored.stage = 9;
        assert!(matches!(stored.to_pet(), Err(Error::InvalidRecord(_))));
    }
}
