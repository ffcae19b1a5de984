//! Error types for petworld-core

use crate::{OwnerId, PetId, Sequence, Version};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Pet not found: {0}")]
    NotFound(PetId),

    #[error("Pet is dead: {0}")]
    DeadPet(PetId),

    #[error("Pet is not dead: {0}")]
    NotDead(PetId),

    #[error("Invalid sequence for {pet}: current {current} is behind last update {last}")]
    InvalidSequence {
        pet: PetId,
        current: Sequence,
        last: Sequence,
    },

    #[error("Version conflict on {pet}: expected {expected}, found {actual}")]
    VersionConflict {
        pet: PetId,
        expected: Version,
        actual: Version,
    },

    #[error("Owner record conflict for {owner}: expected {expected}, found {actual}")]
    OwnerConflict {
        owner: OwnerId,
        expected: Version,
        actual: Version,
    },

    #[error("{pet} is not owned by {owner}")]
    NotOwner { pet: PetId, owner: OwnerId },

    #[error("Invalid pet name: {0}")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether reloading the record and re-running the transition can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::VersionConflict { .. } | Error::OwnerConflict { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
