//! Petworld Config - RON content loader
//!
//! Loads lifecycle content from RON files:
//! - Lifecycle rules (decay intervals, action deltas, evolution thresholds)
//! - The achievement catalog (names, descriptions, rarity, icons)

mod error;
mod loader;
pub mod schema;

pub use error::{Error, Result};
pub use loader::{load_content, Content, Loader};
pub use schema::{AchievementDef, AchievementDefs, RulesFile};
