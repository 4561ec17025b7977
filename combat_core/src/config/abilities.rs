//! Support ability table loading

use super::ConfigError;
use crate::action::{SupportAbility, SupportAbilityTable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for support abilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportAbilitiesConfig {
    #[serde(default)]
    pub abilities: Vec<SupportAbility>,
}

/// Load support abilities from a TOML file
pub fn load_support_abilities(path: &Path) -> Result<SupportAbilityTable, ConfigError> {
    let config: SupportAbilitiesConfig = super::load_toml(path)?;
    SupportAbilityTable::from_abilities(config.abilities)
}

/// Load support abilities from a TOML string
pub fn parse_support_abilities(content: &str) -> Result<SupportAbilityTable, ConfigError> {
    let config: SupportAbilitiesConfig = super::parse_toml(content)?;
    SupportAbilityTable::from_abilities(config.abilities)
}

/// Get the bundled support abilities
pub fn default_support_abilities() -> SupportAbilityTable {
    let toml = include_str!("../../config/support_abilities.toml");
    parse_support_abilities(toml).unwrap_or_else(|err| {
        tracing::error!(%err, "bundled support abilities failed to parse");
        SupportAbilityTable::new()
    })
}
