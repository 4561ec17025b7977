//! Combatant - One participant in an encounter

use crate::stat_block::StatBlock;
use crate::types::{CombatStat, Element, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A timed stat modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffEffect {
    pub stat: CombatStat,
    /// Flat amount added to the derived stat (negative for debuffs)
    pub value: i32,
    /// Duration in turns
    pub duration: u32,
}

impl BuffEffect {
    pub fn new(stat: CombatStat, value: i32, duration: u32) -> Self {
        BuffEffect {
            stat,
            value,
            duration,
        }
    }

    pub fn is_debuff(&self) -> bool {
        self.value < 0
    }
}

/// Buff currently affecting a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub effect: BuffEffect,
    pub remaining_duration: u32,
}

impl ActiveBuff {
    pub fn new(effect: BuffEffect) -> Self {
        ActiveBuff {
            effect,
            remaining_duration: effect.duration,
        }
    }
}

/// Status currently affecting a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub id: String,
    pub stacks: u32,
    pub remaining_duration: u32,
}

/// How an equipped weapon delivers a basic attack
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeaponAttack {
    /// Single target with hit and crit rolls
    #[default]
    Default,
    /// Hits every living combatant on the target's side
    AllEnemies { power_multiplier: f64 },
    /// Banks the attack on the first use, fires on the next
    ChargedSplash {
        charge_turns: u32,
        power_multiplier: f64,
        splash_multiplier: f64,
    },
}

/// Weapon equipped for the encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatWeapon {
    pub item_id: String,
    pub name: String,
    pub weapon_type: String,
    #[serde(default)]
    pub attack: WeaponAttack,
    /// Element fed into the target's stack counter on every hit
    #[serde(default)]
    pub element: Option<Element>,
}

/// A charged weapon attack waiting to be released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponCharge {
    pub turns_remaining: u32,
}

/// Hidden stagger meter for tiered enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stability {
    pub max: u32,
    pub current: u32,
}

impl Stability {
    pub fn new(max: u32) -> Self {
        Stability { max, current: max }
    }
}

/// Per-combatant skill cooldown tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "turns", rename_all = "snake_case")]
pub enum CooldownState {
    /// Usable again once this reaches 0
    Turns(u32),
    /// Once-per-battle skill that has been used
    Spent,
}

impl CooldownState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CooldownState::Turns(0))
    }
}

/// One participant in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub stats: StatBlock,
    /// Current hit points
    #[serde(default)]
    pub hp: u32,
    /// Identity used for support ability dispatch (falls back to `id`)
    #[serde(default)]
    pub character_id: Option<String>,
    /// Enemy tier that sizes the stability meter
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub weaknesses: Vec<Element>,
    #[serde(default)]
    pub weapon: Option<CombatWeapon>,

    // === Encounter-scoped state ===
    #[serde(default)]
    pub buffs: Vec<ActiveBuff>,
    #[serde(default)]
    pub status_effects: Vec<ActiveStatus>,
    #[serde(default)]
    pub element_stacks: BTreeMap<Element, u32>,
    #[serde(default)]
    pub weapon_charge: Option<WeaponCharge>,
    #[serde(default)]
    pub stability: Option<Stability>,
    #[serde(default)]
    pub cooldowns: BTreeMap<String, CooldownState>,
}

impl Combatant {
    /// Create a new combatant at full health
    pub fn new(id: impl Into<String>, name: impl Into<String>, side: Side, stats: StatBlock) -> Self {
        Combatant {
            id: id.into(),
            name: name.into(),
            side,
            stats,
            hp: stats.derived_max_hp(),
            character_id: None,
            tier: None,
            weaknesses: Vec::new(),
            weapon: None,
            buffs: Vec::new(),
            status_effects: Vec::new(),
            element_stacks: BTreeMap::new(),
            weapon_charge: None,
            stability: None,
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn with_weapon(mut self, weapon: CombatWeapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_character(mut self, character_id: impl Into<String>) -> Self {
        self.character_id = Some(character_id.into());
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn with_weakness(mut self, element: Element) -> Self {
        self.weaknesses.push(element);
        self
    }

    /// Identity key for support ability lookup
    pub fn character_key(&self) -> &str {
        self.character_id.as_deref().unwrap_or(&self.id)
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.derived_max_hp()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Derived stat plus all active buffs, never below 0
    pub fn effective(&self, stat: CombatStat) -> f64 {
        let bonus: i64 = self
            .buffs
            .iter()
            .filter(|b| b.effect.stat == stat)
            .map(|b| b.effect.value as i64)
            .sum();
        (self.stats.base_value(stat) + bonus as f64).max(0.0)
    }

    pub fn effective_attack(&self) -> u32 {
        self.effective(CombatStat::Attack).floor() as u32
    }

    pub fn status(&self, status_id: &str) -> Option<&ActiveStatus> {
        self.status_effects.iter().find(|s| s.id == status_id)
    }

    pub fn has_status(&self, status_id: &str) -> bool {
        self.status(status_id).is_some()
    }

    /// Current stack count for an element (0 when absent)
    pub fn element_stack(&self, element: Element) -> u32 {
        self.element_stacks.get(&element).copied().unwrap_or(0)
    }

    pub fn is_weak_to(&self, element: Element) -> bool {
        self.weaknesses.contains(&element)
    }

    pub fn is_charging(&self) -> bool {
        self.weapon_charge.is_some()
    }

    pub fn cooldown(&self, skill_id: &str) -> Option<CooldownState> {
        self.cooldowns.get(skill_id).copied()
    }

    /// Reset encounter-scoped state and restore full health
    pub(crate) fn reset_for_encounter(&mut self) {
        self.hp = self.max_hp();
        self.buffs.clear();
        self.status_effects.clear();
        self.element_stacks.clear();
        self.weapon_charge = None;
        self.cooldowns.clear();
        self.stability = None;
    }

    /// Raise hp, clamped to max. Returns the amount actually restored.
    pub(crate) fn restore_hp(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
        self.hp - before
    }

    /// Lower hp, floored at 0
    pub(crate) fn lose_hp(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fighter() -> Combatant {
        Combatant::new(
            "hero",
            "Hero",
            Side::Player,
            StatBlock::with_hp(100).strength(10).vitality(2),
        )
    }

    #[test]
    fn test_new_combatant_full_health() {
        let hero = make_fighter();
        assert_eq!(hero.hp, 120);
        assert_eq!(hero.max_hp(), 120);
        assert!(hero.is_alive());
    }

    #[test]
    fn test_effective_stat_with_buffs() {
        let mut hero = make_fighter();
        hero.buffs.push(ActiveBuff::new(BuffEffect::new(CombatStat::Attack, 5, 2)));
        hero.buffs.push(ActiveBuff::new(BuffEffect::new(CombatStat::Attack, -3, 2)));
        hero.buffs.push(ActiveBuff::new(BuffEffect::new(CombatStat::Evasion, 10, 2)));

        assert_eq!(hero.effective_attack(), 22);
        assert!((hero.effective(CombatStat::Evasion) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_effective_stat_floor() {
        let mut hero = make_fighter();
        hero.buffs.push(ActiveBuff::new(BuffEffect::new(CombatStat::Defense, -50, 1)));
        assert_eq!(hero.effective(CombatStat::Defense), 0.0);
    }

    #[test]
    fn test_hp_clamping() {
        let mut hero = make_fighter();
        hero.lose_hp(500);
        assert_eq!(hero.hp, 0);
        assert!(!hero.is_alive());

        assert_eq!(hero.restore_hp(50), 50);
        assert_eq!(hero.restore_hp(500), 70);
        assert_eq!(hero.hp, 120);
    }

    #[test]
    fn test_character_key_fallback() {
        let hero = make_fighter();
        assert_eq!(hero.character_key(), "hero");
        assert_eq!(hero.with_character("medic").character_key(), "medic");
    }

    #[test]
    fn test_weapon_attack_serialization() {
        let attack = WeaponAttack::ChargedSplash {
            charge_turns: 1,
            power_multiplier: 1.5,
            splash_multiplier: 0.5,
        };
        let json = serde_json::to_string(&attack).unwrap();
        assert!(json.contains("charged_splash"));
    }
}
