//! StatBlock - Raw character attributes
//!
//! A StatBlock is frozen for the lifetime of a combatant. Everything the
//! engine rolls against is derived from it (see `computed`), with buffs
//! layered on top by `Combatant::effective`.

mod computed;

use serde::{Deserialize, Serialize};

/// Raw attributes of a combatant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    /// Base hit points before vitality scaling
    #[serde(default)]
    pub max_hp: u32,
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub vitality: u32,
    #[serde(default)]
    pub agility: u32,
    #[serde(default)]
    pub focus: u32,
    #[serde(default)]
    pub luck: u32,
    /// Base speed before agility scaling
    #[serde(default)]
    pub speed: u32,
}

impl StatBlock {
    /// Create a stat block with only base hit points set
    pub fn with_hp(max_hp: u32) -> Self {
        StatBlock {
            max_hp,
            ..Default::default()
        }
    }

    pub fn strength(mut self, value: u32) -> Self {
        self.strength = value;
        self
    }

    pub fn vitality(mut self, value: u32) -> Self {
        self.vitality = value;
        self
    }

    pub fn agility(mut self, value: u32) -> Self {
        self.agility = value;
        self
    }

    pub fn focus(mut self, value: u32) -> Self {
        self.focus = value;
        self
    }

    pub fn luck(mut self, value: u32) -> Self {
        self.luck = value;
        self
    }

    pub fn speed(mut self, value: u32) -> Self {
        self.speed = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let stats = StatBlock::with_hp(120).strength(18).agility(4).speed(10);
        assert_eq!(stats.max_hp, 120);
        assert_eq!(stats.strength, 18);
        assert_eq!(stats.agility, 4);
        assert_eq!(stats.vitality, 0);
    }

    #[test]
    fn test_parse_partial_toml() {
        let stats: StatBlock = toml::from_str("max_hp = 80\nfocus = 12").unwrap();
        assert_eq!(stats.max_hp, 80);
        assert_eq!(stats.focus, 12);
        assert_eq!(stats.luck, 0);
    }
}
