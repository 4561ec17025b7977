//! Encounter state - Immutable snapshot threaded through every transition

mod combatant;
mod log;

pub use combatant::{
    ActiveBuff, ActiveStatus, BuffEffect, Combatant, CombatWeapon, CooldownState, Stability,
    WeaponAttack, WeaponCharge,
};
pub use log::CombatLogEntry;

use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input to `CombatEngine::begin_encounter`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatSetup {
    #[serde(default)]
    pub player_party: Vec<Combatant>,
    #[serde(default)]
    pub enemy_party: Vec<Combatant>,
}

impl CombatSetup {
    pub fn new(player_party: Vec<Combatant>, enemy_party: Vec<Combatant>) -> Self {
        CombatSetup {
            player_party,
            enemy_party,
        }
    }
}

/// Whether an encounter has been decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    Ongoing,
    /// Every enemy is down
    Victory,
    /// Every player combatant is down
    Defeat,
}

/// Complete state of one encounter
///
/// Transitions never mutate a state in place: the engine clones, applies the
/// change and returns the new value, so any earlier state stays valid for
/// replay or comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    combatants: BTreeMap<String, Combatant>,
    log: Vec<CombatLogEntry>,
}

impl CombatState {
    pub(crate) fn from_combatants(combatants: BTreeMap<String, Combatant>) -> Self {
        CombatState {
            combatants,
            log: Vec::new(),
        }
    }

    pub fn combatants(&self) -> &BTreeMap<String, Combatant> {
        &self.combatants
    }

    pub fn log(&self) -> &[CombatLogEntry] {
        &self.log
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.combatants.contains_key(id)
    }

    /// Living combatants on a side, in id order
    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .values()
            .filter(move |c| c.side == side && c.is_alive())
    }

    /// Ids of every other combatant on the same side as `id`
    pub fn allies_of(&self, id: &str) -> Vec<String> {
        match self.combatants.get(id) {
            Some(target) => self
                .combatants
                .values()
                .filter(|c| c.side == target.side && c.id != id)
                .map(|c| c.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn outcome(&self) -> EncounterOutcome {
        if self.living(Side::Enemy).next().is_none() {
            EncounterOutcome::Victory
        } else if self.living(Side::Player).next().is_none() {
            EncounterOutcome::Defeat
        } else {
            EncounterOutcome::Ongoing
        }
    }

    /// Log entries appended after `len` entries, for diffing two states
    pub fn log_since(&self, len: usize) -> &[CombatLogEntry] {
        self.log.get(len..).unwrap_or(&[])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.combatants.get_mut(id)
    }

    pub(crate) fn push_log(&mut self, entry: CombatLogEntry) {
        self.log.push(entry);
    }
}
