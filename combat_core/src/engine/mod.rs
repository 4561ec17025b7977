//! Combat engine - Pure state transitions on a CombatState
//!
//! Every public operation takes a state by reference and returns a new one.
//! Internally each operation clones once and mutates the copy, so a failed
//! call drops its work and the caller's state stays the last valid value.

mod damage;
mod status;
mod tick;

use crate::config::CombatConstants;
use crate::error::ValidationError;
use crate::formulas::stability_for_tier;
use crate::state::{CombatSetup, CombatState, Stability};
use crate::status::StatusRegistry;
use crate::types::Side;
use std::collections::BTreeMap;

/// Low-level transition functions for one encounter
#[derive(Debug, Clone, Default)]
pub struct CombatEngine {
    statuses: StatusRegistry,
    constants: CombatConstants,
}

impl CombatEngine {
    pub fn new(statuses: StatusRegistry, constants: CombatConstants) -> Self {
        CombatEngine { statuses, constants }
    }

    /// Engine with the bundled statuses and default constants
    pub fn with_defaults() -> Self {
        Self::new(StatusRegistry::with_defaults(), CombatConstants::default())
    }

    pub fn statuses(&self) -> &StatusRegistry {
        &self.statuses
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    /// Start an encounter from two parties
    ///
    /// Every combatant starts at full health with no buffs, statuses, element
    /// stacks, cooldowns or pending charge. Tiered combatants get a full
    /// stability meter.
    pub fn begin_encounter(&self, setup: &CombatSetup) -> Result<CombatState, ValidationError> {
        if setup.player_party.is_empty() {
            return Err(ValidationError::EmptyParty(Side::Player));
        }
        if setup.enemy_party.is_empty() {
            return Err(ValidationError::EmptyParty(Side::Enemy));
        }

        let mut combatants = BTreeMap::new();
        let parties = [
            (Side::Player, &setup.player_party),
            (Side::Enemy, &setup.enemy_party),
        ];
        for (side, party) in parties {
            for member in party {
                if combatants.contains_key(&member.id) {
                    return Err(ValidationError::DuplicateCombatant(member.id.clone()));
                }

                let mut combatant = member.clone();
                combatant.side = side;
                combatant.reset_for_encounter();
                if let Some(tier) = &combatant.tier {
                    combatant.stability =
                        Some(Stability::new(stability_for_tier(combatant.max_hp(), tier)));
                }
                combatants.insert(combatant.id.clone(), combatant);
            }
        }

        tracing::debug!(
            players = setup.player_party.len(),
            enemies = setup.enemy_party.len(),
            "encounter started"
        );
        Ok(CombatState::from_combatants(combatants))
    }
}
