//! Encounter scenario loading

use combat_core::config::{self, ConfigError};
use combat_core::{
    CombatSetup, CombatWeapon, Combatant, Element, Item, Side, SkillDefinition, StatBlock,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Scenario loading error
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{member} carries unknown skill '{skill}'")]
    UnknownSkill { member: String, skill: String },
    #[error("{member} carries unknown snack '{item}'")]
    UnknownItem { member: String, item: String },
}

/// One party member as written in an encounter file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stats: StatBlock,
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub weaknesses: Vec<Element>,
    #[serde(default)]
    pub weapon: Option<CombatWeapon>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Snacks in the bag, each usable once
    #[serde(default)]
    pub snacks: Vec<String>,
}

impl MemberConfig {
    fn to_combatant(&self, side: Side) -> Combatant {
        let mut combatant = Combatant::new(self.id.clone(), self.name.clone(), side, self.stats);
        combatant.character_id = self.character_id.clone();
        combatant.tier = self.tier.clone();
        combatant.weaknesses = self.weaknesses.clone();
        combatant.weapon = self.weapon.clone();
        combatant
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub name: String,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub players: Vec<MemberConfig>,
    #[serde(default)]
    pub enemies: Vec<MemberConfig>,
}

fn default_max_rounds() -> u32 {
    30
}

/// Skills and snacks a combatant brings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loadout {
    pub skills: Vec<String>,
    pub snacks: Vec<String>,
}

/// Everything needed to run one encounter
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub max_rounds: u32,
    pub setup: CombatSetup,
    pub loadouts: HashMap<String, Loadout>,
    pub skills: HashMap<String, SkillDefinition>,
    pub items: HashMap<String, Item>,
}

impl Scenario {
    /// Bundled encounter, skills and snacks
    pub fn bundled() -> Result<Self, ScenarioError> {
        Self::from_parts(
            config::parse_toml(include_str!("../config/encounter.toml"))?,
            config::parse_skill_configs(include_str!("../config/skills.toml"))?,
            config::parse_item_configs(include_str!("../config/items.toml"))?,
        )
    }

    /// Encounter from a file, using the bundled skills and snacks
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_parts(
            config::load_toml(path)?,
            config::parse_skill_configs(include_str!("../config/skills.toml"))?,
            config::parse_item_configs(include_str!("../config/items.toml"))?,
        )
    }

    pub fn from_parts(
        encounter: EncounterConfig,
        skills: HashMap<String, SkillDefinition>,
        items: HashMap<String, Item>,
    ) -> Result<Self, ScenarioError> {
        let mut loadouts = HashMap::new();
        let members = encounter
            .players
            .iter()
            .chain(encounter.enemies.iter());
        for member in members {
            if let Some(skill) = member.skills.iter().find(|s| !skills.contains_key(*s)) {
                return Err(ScenarioError::UnknownSkill {
                    member: member.id.clone(),
                    skill: skill.clone(),
                });
            }
            if let Some(item) = member.snacks.iter().find(|i| !items.contains_key(*i)) {
                return Err(ScenarioError::UnknownItem {
                    member: member.id.clone(),
                    item: item.clone(),
                });
            }
            loadouts.insert(
                member.id.clone(),
                Loadout {
                    skills: member.skills.clone(),
                    snacks: member.snacks.clone(),
                },
            );
        }

        let setup = CombatSetup::new(
            encounter
                .players
                .iter()
                .map(|m| m.to_combatant(Side::Player))
                .collect(),
            encounter
                .enemies
                .iter()
                .map(|m| m.to_combatant(Side::Enemy))
                .collect(),
        );

        Ok(Scenario {
            name: encounter.name,
            max_rounds: encounter.max_rounds,
            setup,
            loadouts,
            skills,
            items,
        })
    }
}
