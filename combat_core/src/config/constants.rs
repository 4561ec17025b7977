//! Tunable combat constants

use crate::formulas::CRIT_DAMAGE_MULTIPLIER;
use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Element hits on one target before it bursts
    #[serde(default = "default_stack_threshold")]
    pub stack_threshold: u32,
    #[serde(default = "default_crit_damage_multiplier")]
    pub crit_damage_multiplier: f64,
    /// Status applied when a stability meter breaks; also the turn order skip marker
    #[serde(default = "default_stagger_status_id")]
    pub stagger_status_id: String,
    #[serde(default = "default_stagger_duration")]
    pub stagger_duration: u32,
    /// Extra cooldown turns removed from the attacker on a weakness hit
    #[serde(default = "default_weakness_cooldown_reduction")]
    pub weakness_cooldown_reduction: u32,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            stack_threshold: default_stack_threshold(),
            crit_damage_multiplier: default_crit_damage_multiplier(),
            stagger_status_id: default_stagger_status_id(),
            stagger_duration: default_stagger_duration(),
            weakness_cooldown_reduction: default_weakness_cooldown_reduction(),
        }
    }
}

fn default_stack_threshold() -> u32 {
    3
}
fn default_crit_damage_multiplier() -> f64 {
    CRIT_DAMAGE_MULTIPLIER
}
fn default_stagger_status_id() -> String {
    "staggered".to_string()
}
fn default_stagger_duration() -> u32 {
    1
}
fn default_weakness_cooldown_reduction() -> u32 {
    1
}
