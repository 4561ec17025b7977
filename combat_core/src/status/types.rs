//! Status definition types

use crate::types::Element;
use serde::{Deserialize, Serialize};

/// What a status does each time it ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    Damage,
    Heal,
}

/// Periodic effect applied at end of turn, per stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTick {
    pub mode: TickMode,
    pub amount: u32,
    /// Reported on the damage entry; never feeds element stacks
    #[serde(default)]
    pub element: Option<Element>,
}

/// Content definition of a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDefinition {
    /// Unique identifier (e.g., "burn", "staggered", "target_lock")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Periodic effect; marker statuses have none
    #[serde(default)]
    pub tick: Option<StatusTick>,
    /// Lose one stack whenever the bearer is hit by a basic attack
    #[serde(default)]
    pub consumed_on_hit: bool,
    /// Extra damage per stack added to hits that consume this status
    #[serde(default)]
    pub bonus_damage_per_stack: u32,
}

impl StatusDefinition {
    /// Create a marker status with no tick
    pub fn marker(id: impl Into<String>) -> Self {
        StatusDefinition {
            id: id.into(),
            name: None,
            tick: None,
            consumed_on_hit: false,
            bonus_damage_per_stack: 0,
        }
    }

    /// Create a status that damages its bearer each turn
    pub fn damage_over_time(id: impl Into<String>, amount: u32, element: Option<Element>) -> Self {
        StatusDefinition {
            tick: Some(StatusTick {
                mode: TickMode::Damage,
                amount,
                element,
            }),
            ..Self::marker(id)
        }
    }

    /// Create a status that heals its bearer each turn
    pub fn heal_over_time(id: impl Into<String>, amount: u32) -> Self {
        StatusDefinition {
            tick: Some(StatusTick {
                mode: TickMode::Heal,
                amount,
                element: None,
            }),
            ..Self::marker(id)
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
