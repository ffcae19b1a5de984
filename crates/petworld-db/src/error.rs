//! Error types for database operations.

use petworld_core::{OwnerId, PetId, Version};
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored version moved on since the caller read it.
    #[error("Version conflict on {pet}: expected {expected}, found {actual}")]
    VersionConflict {
        pet: PetId,
        expected: Version,
        actual: Version,
    },

    /// Stored owner record moved on since the caller read it.
    #[error("Owner record conflict for {owner}: expected {expected}, found {actual}")]
    OwnerConflict {
        owner: OwnerId,
        expected: Version,
        actual: Version,
    },

    /// A stored row that does not decode into a valid record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for petworld_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::VersionConflict {
                pet,
                expected,
                actual,
            } => petworld_core::Error::VersionConflict {
                pet,
                expected,
                actual,
            },
            Error::OwnerConflict {
                owner,
                expected,
                actual,
            } => petworld_core::Error::OwnerConflict {
                owner,
                expected,
                actual,
            },
            other => petworld_core::Error::Storage(other.to_string()),
        }
    }
}
