//! End-of-turn processing

use super::CombatEngine;
use crate::state::{CombatState, CooldownState};
use crate::status::TickMode;
use crate::types::Element;

/// A tick payload resolved for one combatant
struct PendingTick {
    mode: TickMode,
    amount: u32,
    element: Option<Element>,
}

impl CombatEngine {
    /// Advance every combatant by one turn
    ///
    /// For each living combatant: status ticks fire (amount x stacks), then
    /// status and buff durations drop by 1 and expired entries are removed.
    /// Skill cooldowns and pending weapon charge countdowns also drop by 1.
    /// Tick damage goes through the plain path and never feeds element stacks.
    pub fn tick_end_of_turn(&self, state: &CombatState) -> CombatState {
        let mut next = state.clone();
        let ids: Vec<String> = next.combatants().keys().cloned().collect();

        for id in &ids {
            let pending = match next.get(id) {
                Some(c) if c.is_alive() => self.pending_ticks(c),
                _ => continue,
            };

            for tick in pending {
                if !next.get(id).is_some_and(|c| c.is_alive()) {
                    break;
                }
                let result = match tick.mode {
                    TickMode::Damage => {
                        self.tick_damage_in_place(&mut next, id, id, tick.amount, tick.element)
                    }
                    TickMode::Heal => self.heal_in_place(&mut next, id, id, tick.amount).map(|_| ()),
                };
                // ids come from the state itself
                if let Err(err) = result {
                    tracing::error!(%err, "status tick failed");
                }
            }

            if let Some(combatant) = next.get_mut(id) {
                for status in combatant.status_effects.iter_mut() {
                    status.remaining_duration = status.remaining_duration.saturating_sub(1);
                }
                combatant.status_effects.retain(|s| s.remaining_duration > 0);

                for buff in combatant.buffs.iter_mut() {
                    buff.remaining_duration = buff.remaining_duration.saturating_sub(1);
                }
                combatant.buffs.retain(|b| b.remaining_duration > 0);

                for cooldown in combatant.cooldowns.values_mut() {
                    if let CooldownState::Turns(turns) = cooldown {
                        *turns = turns.saturating_sub(1);
                    }
                }
                combatant.cooldowns.retain(|_, c| !c.is_ready());

                if let Some(charge) = combatant.weapon_charge.as_mut() {
                    charge.turns_remaining = charge.turns_remaining.saturating_sub(1);
                }
            }
        }

        next
    }

    fn pending_ticks(&self, combatant: &crate::state::Combatant) -> Vec<PendingTick> {
        combatant
            .status_effects
            .iter()
            .filter_map(|status| {
                let tick = self.statuses.get(&status.id)?.tick?;
                Some(PendingTick {
                    mode: tick.mode,
                    amount: tick.amount.saturating_mul(status.stacks),
                    element: tick.element,
                })
            })
            .filter(|tick| tick.amount > 0)
            .collect()
    }
}
