//! Id allocation counter.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Key of the pet id counter row.
pub const PET_ID_COUNTER: &str = "pet_id";

/// Stored monotonic counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredCounter {
    /// Counter name.
    #[primary_key]
    pub id: String,
    /// Last value handed out.
    pub value: u64,
}

impl StoredCounter {
    /// Create a counter row.
    pub fn new(id: impl Into<String>, value: u64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}
