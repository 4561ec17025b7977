//! Core enums shared across the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which party a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The opposing side
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Elemental affinity carried by weapons, items, skills and status ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Ice,
    Lightning,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Fire,
            Element::Ice,
            Element::Lightning,
            Element::Water,
            Element::Earth,
            Element::Wind,
            Element::Light,
            Element::Dark,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Ice => "ice",
            Element::Lightning => "lightning",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Wind => "wind",
            Element::Light => "light",
            Element::Dark => "dark",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived combat stat that buffs and debuffs modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStat {
    Attack,
    Defense,
    Accuracy,
    Evasion,
    CritChance,
    Resistance,
    Speed,
}

impl CombatStat {
    pub fn as_str(self) -> &'static str {
        match self {
            CombatStat::Attack => "attack",
            CombatStat::Defense => "defense",
            CombatStat::Accuracy => "accuracy",
            CombatStat::Evasion => "evasion",
            CombatStat::CritChance => "crit_chance",
            CombatStat::Resistance => "resistance",
            CombatStat::Speed => "speed",
        }
    }
}

impl fmt::Display for CombatStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
