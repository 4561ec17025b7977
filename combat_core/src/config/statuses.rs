//! Status definition loading

use super::ConfigError;
use crate::status::{StatusDefinition, StatusRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for status definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusesConfig {
    #[serde(default)]
    pub statuses: Vec<StatusDefinition>,
}

/// Load status definitions from a TOML file
pub fn load_status_definitions(path: &Path) -> Result<StatusRegistry, ConfigError> {
    let config: StatusesConfig = super::load_toml(path)?;
    StatusRegistry::from_definitions(config.statuses)
}

/// Load status definitions from a TOML string
pub fn parse_status_definitions(content: &str) -> Result<StatusRegistry, ConfigError> {
    let config: StatusesConfig = super::parse_toml(content)?;
    StatusRegistry::from_definitions(config.statuses)
}

/// Load status definitions from a JSON array
pub fn parse_status_definitions_json(content: &str) -> Result<StatusRegistry, ConfigError> {
    let definitions: Vec<StatusDefinition> = super::parse_json(content)?;
    StatusRegistry::from_definitions(definitions)
}
