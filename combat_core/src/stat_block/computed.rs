//! Computed/derived stat calculations for StatBlock

use crate::formulas;
use crate::stat_block::StatBlock;
use crate::types::CombatStat;

impl StatBlock {
    pub fn derived_max_hp(&self) -> u32 {
        formulas::max_hp(self.max_hp, self.vitality)
    }

    pub fn attack_power(&self) -> u32 {
        formulas::attack_power(self.strength)
    }

    pub fn defense_power(&self) -> u32 {
        formulas::defense_power(self.vitality)
    }

    pub fn derived_speed(&self) -> f64 {
        formulas::speed(self.speed, self.agility)
    }

    pub fn accuracy(&self) -> f64 {
        formulas::accuracy(self.focus)
    }

    pub fn evasion(&self) -> f64 {
        formulas::evasion(self.agility)
    }

    pub fn crit_chance(&self) -> f64 {
        formulas::crit_chance(self.focus, self.luck)
    }

    pub fn general_resistance(&self) -> u32 {
        formulas::general_resistance(self.focus)
    }

    pub fn skill_potency(&self) -> f64 {
        formulas::skill_potency_multiplier(self.focus)
    }

    /// Get the unbuffed value of a combat stat
    pub fn base_value(&self, stat: CombatStat) -> f64 {
        match stat {
            CombatStat::Attack => self.attack_power() as f64,
            CombatStat::Defense => self.defense_power() as f64,
            CombatStat::Accuracy => self.accuracy(),
            CombatStat::Evasion => self.evasion(),
            CombatStat::CritChance => self.crit_chance(),
            CombatStat::Resistance => self.general_resistance() as f64,
            CombatStat::Speed => self.derived_speed(),
        }
    }
}
