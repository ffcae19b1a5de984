//! Owner achievement record model.

use super::{decode_achievements, encode_achievements};
use crate::error::Result;
use native_db::*;
use native_model::{native_model, Model};
use petworld_core::{OwnerAchievements, OwnerId, Version};
use serde::{Deserialize, Serialize};

/// Stored achievements earned by one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredOwner {
    /// Primary key - owner address.
    #[primary_key]
    pub owner: String,
    /// Record version for compare-and-set writes.
    pub version: u64,
    /// Serialized achievement ids, in unlock order.
    pub achievements: Vec<u8>,
}

impl StoredOwner {
    /// Create from an owner record at the version it will be stored as.
    pub fn from_record(record: &OwnerAchievements, version: Version) -> Result<Self> {
        Ok(Self {
            owner: record.owner.as_str().to_string(),
            version: version.raw(),
            achievements: encode_achievements(record.iter())?,
        })
    }

    /// Convert to an owner record.
    pub fn to_record(&self) -> Result<OwnerAchievements> {
        let mut record = OwnerAchievements::new(OwnerId::new(self.owner.clone()));
        record.record(decode_achievements(
            &self.achievements,
            &format!("owner {}", self.owner),
        )?);
        Ok(record)
    }

    /// Stored version.
    pub fn version(&self) -> Version {
        Version(self.version)
    }
}
