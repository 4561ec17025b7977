//! Status and buff application

use super::CombatEngine;
use crate::error::ValidationError;
use crate::state::{ActiveBuff, ActiveStatus, BuffEffect, CombatLogEntry, CombatState};

impl CombatEngine {
    /// Apply a registered status to a target (immutable API)
    ///
    /// If the status is already active its stacks and duration are replaced,
    /// not added. Unknown status ids fail the call.
    pub fn apply_status(
        &self,
        state: &CombatState,
        target_id: &str,
        status_id: &str,
        duration: u32,
        stacks: u32,
    ) -> Result<CombatState, ValidationError> {
        let mut next = state.clone();
        self.status_in_place(&mut next, target_id, status_id, duration, stacks)?;
        Ok(next)
    }

    /// Apply a timed stat modifier to a target (immutable API)
    pub fn apply_buff(
        &self,
        state: &CombatState,
        target_id: &str,
        effect: BuffEffect,
    ) -> Result<CombatState, ValidationError> {
        let mut next = state.clone();
        self.buff_in_place(&mut next, target_id, effect)?;
        Ok(next)
    }

    pub(crate) fn status_in_place(
        &self,
        state: &mut CombatState,
        target_id: &str,
        status_id: &str,
        duration: u32,
        stacks: u32,
    ) -> Result<(), ValidationError> {
        if !self.statuses.contains(status_id) {
            return Err(ValidationError::UnknownStatus(status_id.to_string()));
        }
        let target = state
            .get_mut(target_id)
            .ok_or_else(|| ValidationError::UnknownCombatant(target_id.to_string()))?;

        match target.status_effects.iter_mut().find(|s| s.id == status_id) {
            Some(existing) => {
                existing.stacks = stacks;
                existing.remaining_duration = duration;
            }
            None => target.status_effects.push(ActiveStatus {
                id: status_id.to_string(),
                stacks,
                remaining_duration: duration,
            }),
        }

        state.push_log(CombatLogEntry::StatusApplied {
            target_id: target_id.to_string(),
            status_id: status_id.to_string(),
            stacks,
            duration,
        });
        Ok(())
    }

    pub(crate) fn buff_in_place(
        &self,
        state: &mut CombatState,
        target_id: &str,
        effect: BuffEffect,
    ) -> Result<(), ValidationError> {
        let target = state
            .get_mut(target_id)
            .ok_or_else(|| ValidationError::UnknownCombatant(target_id.to_string()))?;
        target.buffs.push(ActiveBuff::new(effect));

        state.push_log(CombatLogEntry::BuffApplied {
            target_id: target_id.to_string(),
            stat: effect.stat,
            value: effect.value,
            duration: effect.duration,
        });
        Ok(())
    }

    /// Remove one stack of every consumed-on-hit status on the target
    ///
    /// Returns the bonus damage those stacks granted to the hit. Statuses
    /// reaching 0 stacks are removed.
    pub(crate) fn consume_on_hit_in_place(&self, state: &mut CombatState, target_id: &str) -> u32 {
        let Some(target) = state.get_mut(target_id) else {
            return 0;
        };

        let mut bonus = 0;
        for status in target.status_effects.iter_mut() {
            if let Some(def) = self.statuses.get(&status.id) {
                if def.consumed_on_hit && status.stacks > 0 {
                    bonus = def
                        .bonus_damage_per_stack
                        .saturating_mul(status.stacks)
                        .saturating_add(bonus);
                    status.stacks -= 1;
                }
            }
        }
        target.status_effects.retain(|s| {
            self.statuses
                .get(&s.id)
                .map_or(true, |def| !def.consumed_on_hit || s.stacks > 0)
        });
        bonus
    }
}
