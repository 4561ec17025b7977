//! Damage, healing and elemental bursts

use super::CombatEngine;
use crate::error::ValidationError;
use crate::state::{CombatLogEntry, CombatState};
use crate::types::Element;

impl CombatEngine {
    /// Apply raw damage to a target (immutable API)
    ///
    /// Hp is floored at 0. An element feeds the target's stack counter; when
    /// the counter reaches the stack threshold it is cleared and the target's
    /// living allies take `max(1, target_max_hp / 10)` splash damage, recorded
    /// by a single `ElementBurst` entry.
    pub fn apply_damage(
        &self,
        state: &CombatState,
        source_id: &str,
        target_id: &str,
        amount: u32,
        element: Option<Element>,
    ) -> Result<CombatState, ValidationError> {
        let mut next = state.clone();
        self.damage_in_place(&mut next, source_id, target_id, amount, element)?;
        Ok(next)
    }

    /// Restore hp to a target, clamped to its max (immutable API)
    pub fn heal(
        &self,
        state: &CombatState,
        source_id: &str,
        target_id: &str,
        amount: u32,
    ) -> Result<CombatState, ValidationError> {
        let mut next = state.clone();
        self.heal_in_place(&mut next, source_id, target_id, amount)?;
        Ok(next)
    }

    pub(crate) fn damage_in_place(
        &self,
        state: &mut CombatState,
        source_id: &str,
        target_id: &str,
        amount: u32,
        element: Option<Element>,
    ) -> Result<(), ValidationError> {
        let threshold = self.constants.stack_threshold;
        let (burst, broke_stability) = {
            let target = state
                .get_mut(target_id)
                .ok_or_else(|| ValidationError::UnknownCombatant(target_id.to_string()))?;
            target.lose_hp(amount);

            let mut broke_stability = false;
            if let Some(meter) = target.stability.as_mut() {
                if amount > 0 && target.hp > 0 {
                    meter.current = meter.current.saturating_sub(amount);
                    if meter.current == 0 {
                        meter.current = meter.max;
                        broke_stability = true;
                    }
                }
            }

            let mut burst = None;
            if let Some(element) = element {
                let count = target.element_stacks.entry(element).or_insert(0);
                *count += 1;
                if *count >= threshold {
                    target.element_stacks.remove(&element);
                    burst = Some((element, (target.max_hp() / 10).max(1)));
                }
            }
            (burst, broke_stability)
        };

        state.push_log(CombatLogEntry::Damage {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            amount,
            element,
        });

        if let Some((element, splash_amount)) = burst {
            let affected_ids: Vec<String> = state
                .allies_of(target_id)
                .into_iter()
                .filter(|id| state.get(id).is_some_and(|c| c.is_alive()))
                .collect();
            for id in &affected_ids {
                if let Some(ally) = state.get_mut(id) {
                    ally.lose_hp(splash_amount);
                }
            }
            tracing::debug!(
                %element,
                target = target_id,
                splash = splash_amount,
                affected = affected_ids.len(),
                "element burst"
            );
            state.push_log(CombatLogEntry::ElementBurst {
                element,
                target_id: target_id.to_string(),
                splash_amount,
                affected_ids,
            });
        }

        if broke_stability {
            self.stagger_in_place(state, target_id)?;
        }

        Ok(())
    }

    /// Damage that never touches element stacks or stability (status ticks)
    pub(crate) fn tick_damage_in_place(
        &self,
        state: &mut CombatState,
        source_id: &str,
        target_id: &str,
        amount: u32,
        element: Option<Element>,
    ) -> Result<(), ValidationError> {
        let target = state
            .get_mut(target_id)
            .ok_or_else(|| ValidationError::UnknownCombatant(target_id.to_string()))?;
        target.lose_hp(amount);

        state.push_log(CombatLogEntry::Damage {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            amount,
            element,
        });
        Ok(())
    }

    /// Returns the hp actually restored
    pub(crate) fn heal_in_place(
        &self,
        state: &mut CombatState,
        source_id: &str,
        target_id: &str,
        amount: u32,
    ) -> Result<u32, ValidationError> {
        let target = state
            .get_mut(target_id)
            .ok_or_else(|| ValidationError::UnknownCombatant(target_id.to_string()))?;
        let restored = target.restore_hp(amount);

        state.push_log(CombatLogEntry::Healed {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            amount: restored,
        });
        Ok(restored)
    }

    fn stagger_in_place(&self, state: &mut CombatState, target_id: &str) -> Result<(), ValidationError> {
        state.push_log(CombatLogEntry::Staggered {
            target_id: target_id.to_string(),
        });

        let stagger_id = self.constants.stagger_status_id.clone();
        if self.statuses.contains(&stagger_id) {
            self.status_in_place(state, target_id, &stagger_id, self.constants.stagger_duration, 1)?;
        } else {
            tracing::warn!(status = %stagger_id, "stagger status is not registered");
        }
        tracing::debug!(target = target_id, "stability broken");
        Ok(())
    }
}
