//! Database models for persistent storage.

mod counter;
mod owner;
mod pet;

pub use counter::*;
pub use owner::*;
pub use pet::*;

use crate::error::{Error, Result};
use petworld_core::Achievement;

/// Serialize achievement ids, keeping their order.
pub(crate) fn encode_achievements(achievements: impl Iterator<Item = Achievement>) -> Result<Vec<u8>> {
    let ids: Vec<u32> = achievements.map(|a| a.id()).collect();
    Ok(bincode::serialize(&ids)?)
}

/// Deserialize achievement ids written by [`encode_achievements`].
pub(crate) fn decode_achievements(bytes: &[u8], record: &str) -> Result<Vec<Achievement>> {
    let ids: Vec<u32> = bincode::deserialize(bytes)?;
    ids.into_iter()
        .map(|id| {
            Achievement::from_id(id)
                .ok_or_else(|| Error::InvalidRecord(format!("{}: achievement {}", record, id)))
        })
        .collect()
}
