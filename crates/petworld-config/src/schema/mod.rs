//! Schema definitions for RON content files

pub mod achievement;
pub mod rules;

pub use achievement::{AchievementDef, AchievementDefs};
pub use rules::RulesFile;
