//! Skill and item content loading

use super::ConfigError;
use crate::action::{Item, SkillDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for skill definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

/// Container for consumable items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsConfig {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Load skill definitions from a TOML file
pub fn load_skill_configs(path: &Path) -> Result<HashMap<String, SkillDefinition>, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    index_skills(config.skills)
}

/// Load skill definitions from a TOML string
pub fn parse_skill_configs(content: &str) -> Result<HashMap<String, SkillDefinition>, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    index_skills(config.skills)
}

/// Load items from a TOML string
pub fn parse_item_configs(content: &str) -> Result<HashMap<String, Item>, ConfigError> {
    let config: ItemsConfig = super::parse_toml(content)?;

    let mut map = HashMap::new();
    for item in config.items {
        if map.contains_key(&item.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate item id '{}'",
                item.id
            )));
        }
        map.insert(item.id.clone(), item);
    }
    Ok(map)
}

fn index_skills(skills: Vec<SkillDefinition>) -> Result<HashMap<String, SkillDefinition>, ConfigError> {
    let mut map = HashMap::new();
    for skill in skills {
        skill.validate()?;
        if map.contains_key(&skill.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate skill id '{}'",
                skill.id
            )));
        }
        map.insert(skill.id.clone(), skill);
    }
    Ok(map)
}
