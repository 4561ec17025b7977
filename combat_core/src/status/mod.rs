//! Status registry - Catalog of status definitions

mod types;

pub use types::{StatusDefinition, StatusTick, TickMode};

use crate::config::ConfigError;
use std::collections::HashMap;

/// Lookup table of status definitions, built once from content
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    /// Mapping from status ID to definition
    definitions: HashMap<String, StatusDefinition>,
}

impl StatusRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        StatusRegistry {
            definitions: HashMap::new(),
        }
    }

    /// Build a registry, rejecting duplicate ids
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = StatusDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for definition in definitions {
            if registry.definitions.contains_key(&definition.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate status id '{}'",
                    definition.id
                )));
            }
            registry.register(definition);
        }
        Ok(registry)
    }

    /// Register a status, replacing any previous definition with the same id
    pub fn register(&mut self, definition: StatusDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// Get a status definition by ID
    pub fn get(&self, id: &str) -> Option<&StatusDefinition> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Load the bundled status definitions
    pub fn with_defaults() -> Self {
        let toml = include_str!("../../config/statuses.toml");
        crate::config::parse_status_definitions(toml).unwrap_or_else(|err| {
            tracing::error!(%err, "bundled statuses failed to parse, using fallback");
            let mut registry = Self::new();
            registry.register(StatusDefinition::marker("staggered"));
            registry
        })
    }
}
