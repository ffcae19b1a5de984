//! RON content loader

use crate::error::{Error, Result};
use crate::schema::rules::validate;
use crate::schema::{AchievementDef, AchievementDefs, RulesFile};
use petworld_core::{Achievement, AchievementInfo, AchievementRegistry, LifecycleConfig};
use std::fs;
use std::path::Path;

/// Loaded lifecycle content
#[derive(Debug, Clone)]
pub struct Content {
    /// Lifecycle tunables
    pub rules: LifecycleConfig,
    /// Achievement catalog
    pub achievements: AchievementRegistry,
}

impl Content {
    /// Default rules and the builtin catalog
    pub fn builtin() -> Self {
        Self {
            rules: LifecycleConfig::default(),
            achievements: AchievementRegistry::builtin(),
        }
    }

    /// Check the rules against what the state machine can honor
    ///
    /// Loaded content is checked as it is read; this covers content built
    /// by hand.
    pub fn validate(&self) -> Result<()> {
        validate(&self.rules)
    }

    /// Get catalog metadata for an achievement
    pub fn get_achievement(&self, achievement: Achievement) -> Option<&AchievementInfo> {
        self.achievements.get(achievement)
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Loader for RON content files
///
/// Two document kinds are recognized: a `rules:` document holding the
/// lifecycle tunables and an `achievements:` document holding catalog
/// entries. Rules may be defined once; each achievement id may be defined
/// once. Achievements no file defines keep their builtin metadata.
pub struct Loader {
    rules: Option<LifecycleConfig>,
    achievements: AchievementRegistry,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            rules: None,
            achievements: AchievementRegistry::new(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        // A rules document also has an `achievements:` section, so test it first
        if filename.contains("rule") || content.contains("rules:") {
            self.load_rules_str(&content)
        } else if filename.contains("achievement") || content.contains("achievements:") {
            self.load_achievements_str(&content)
        } else {
            self.load_single_definition(&content)
        }
    }

    /// Load lifecycle rules from a RON string
    pub fn load_rules_str(&mut self, content: &str) -> Result<()> {
        let file: RulesFile = ron::from_str(content)?;
        self.set_rules(file.rules)
    }

    /// Load achievement definitions from a RON string
    pub fn load_achievements_str(&mut self, content: &str) -> Result<()> {
        let file: AchievementDefs = ron::from_str(content)?;
        for def in file.achievements {
            self.add_achievement(def)?;
        }
        Ok(())
    }

    /// Try to load a bare rules struct or a single achievement
    fn load_single_definition(&mut self, content: &str) -> Result<()> {
        if let Ok(def) = ron::from_str::<AchievementDef>(content) {
            return self.add_achievement(def);
        }

        if let Ok(rules) = ron::from_str::<LifecycleConfig>(content) {
            return self.set_rules(rules);
        }

        Err(Error::InvalidSchema(
            "Could not parse as any known definition type".to_string(),
        ))
    }

    fn set_rules(&mut self, rules: LifecycleConfig) -> Result<()> {
        if self.rules.is_some() {
            return Err(Error::DuplicateDefinition("rules".to_string()));
        }
        validate(&rules)?;
        self.rules = Some(rules);
        Ok(())
    }

    fn add_achievement(&mut self, def: AchievementDef) -> Result<()> {
        let info = def.into_info()?;
        if self.achievements.contains(info.achievement) {
            return Err(Error::DuplicateDefinition(info.achievement.to_string()));
        }
        self.achievements.insert(info);
        Ok(())
    }

    /// Load all RON files from a directory
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the content
    ///
    /// Missing rules fall back to the defaults; missing catalog entries fall
    /// back to the builtin catalog.
    pub fn finish(self) -> Content {
        let mut achievements = AchievementRegistry::new();
        let builtin = AchievementRegistry::builtin();
        for achievement in Achievement::ALL {
            let info = self
                .achievements
                .get(achievement)
                .or_else(|| builtin.get(achievement));
            if let Some(info) = info {
                achievements.insert(info.clone());
            }
        }

        Content {
            rules: self.rules.unwrap_or_default(),
            achievements,
        }
    }

    /// Whether a rules document has been loaded
    pub fn has_rules(&self) -> bool {
        self.rules.is_some()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load content from a directory of RON files
pub fn load_content(path: impl AsRef<Path>) -> Result<Content> {
    let mut loader = Loader::new();
    loader.load_directory(path)?;
    Ok(loader.finish())
}
