//! Achievement catalog schema

use crate::error::{Error, Result};
use petworld_core::{Achievement, AchievementInfo, Rarity};
use serde::{Deserialize, Serialize};

/// Definition of one catalog entry, keyed by its numeric badge id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Numeric id (0..=7)
    pub id: u32,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rarity")]
    pub rarity: Rarity,
    /// Icon for UI
    #[serde(default)]
    pub icon: String,
}

fn default_rarity() -> Rarity {
    Rarity::Common
}

impl AchievementDef {
    /// Create a new definition
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            rarity: Rarity::Common,
            icon: String::new(),
        }
    }

    /// Resolve into catalog metadata
    pub fn into_info(self) -> Result<AchievementInfo> {
        let achievement = Achievement::from_id(self.id)
            .ok_or_else(|| Error::InvalidSchema(format!("Unknown achievement id: {}", self.id)))?;
        if self.name.trim().is_empty() {
            return Err(Error::MissingField(format!("{}.name", achievement)));
        }
        Ok(AchievementInfo::new(
            achievement,
            self.name,
            self.description,
            self.rarity,
            self.icon,
        ))
    }
}

/// A catalog document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AchievementDefs {
    pub achievements: Vec<AchievementDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievement_def_ron() {
        let ron_str = r#"
        (
            id: 4,
            name: "Perfectionist",
            description: "Max out every stat",
            rarity: Epic,
        )
        "#;

        let def: AchievementDef = ron::from_str(ron_str).unwrap();
        let info = def.into_info().unwrap();
        assert_eq!(info.achievement, Achievement::PerfectStats);
        assert_eq!(info.rarity, Rarity::Epic);
        assert_eq!(info.icon, "");
    }

    #[test]
    fn test_unknown_id() {
        let err = AchievementDef::new(8, "Ghost").into_info().unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn test_blank_name() {
        let err = AchievementDef::new(0, "  ").into_info().unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }
}
