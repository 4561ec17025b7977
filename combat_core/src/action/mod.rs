//! Action processing - Resolve one issued action into engine transitions
//!
//! `CombatActionProcessor::execute` is the only entry point. It works on a
//! single clone of the incoming state; actions that reference unknown or
//! defeated combatants, unknown items or skills, or skills on cooldown are
//! consumed as a `TurnSkipped` entry and change nothing else. Content errors
//! (an ability naming an unregistered status) fail the whole call.

mod attack;
mod skill;
mod snack;
mod support;

pub use skill::{SkillDefinition, SkillStatus, SkillTarget};
pub use snack::{EffectTarget, Item, ItemEffect};
pub use support::{AbilityEffect, AbilityTarget, EffectKind, SupportAbility, SupportAbilityTable};

use crate::engine::CombatEngine;
use crate::error::ValidationError;
use crate::state::{CombatLogEntry, CombatState, CooldownState};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single action issued by a player or enemy controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatAction {
    BasicAttack {
        actor_id: String,
        target_id: String,
    },
    SupportAbility {
        actor_id: String,
        target_id: Option<String>,
    },
    SnackUse {
        actor_id: String,
        snack_item_id: String,
        target_id: Option<String>,
    },
    SkillUse {
        actor_id: String,
        skill_id: String,
        target_id: Option<String>,
    },
}

impl CombatAction {
    pub fn actor_id(&self) -> &str {
        match self {
            CombatAction::BasicAttack { actor_id, .. }
            | CombatAction::SupportAbility { actor_id, .. }
            | CombatAction::SnackUse { actor_id, .. }
            | CombatAction::SkillUse { actor_id, .. } => actor_id,
        }
    }
}

/// Skill metadata provider
pub type SkillLookup = Box<dyn Fn(&str) -> Option<SkillDefinition> + Send + Sync>;
/// Item metadata provider
pub type ItemLookup = Box<dyn Fn(&str) -> Option<Item> + Send + Sync>;

/// Orchestrates engine calls for issued actions
pub struct CombatActionProcessor {
    engine: CombatEngine,
    support_abilities: SupportAbilityTable,
    skill_lookup: SkillLookup,
    item_lookup: ItemLookup,
}

impl CombatActionProcessor {
    pub fn new(
        engine: CombatEngine,
        support_abilities: SupportAbilityTable,
        skill_lookup: impl Fn(&str) -> Option<SkillDefinition> + Send + Sync + 'static,
        item_lookup: impl Fn(&str) -> Option<Item> + Send + Sync + 'static,
    ) -> Self {
        CombatActionProcessor {
            engine,
            support_abilities,
            skill_lookup: Box::new(skill_lookup),
            item_lookup: Box::new(item_lookup),
        }
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn support_abilities(&self) -> &SupportAbilityTable {
        &self.support_abilities
    }

    /// Resolve an action (uses thread RNG)
    pub fn execute<R>(
        &self,
        state: &CombatState,
        action: &CombatAction,
        reward_factory: impl FnOnce(&CombatState) -> R,
    ) -> Result<(CombatState, R), ValidationError> {
        let mut rng = rand::thread_rng();
        self.execute_with_rng(state, action, &mut rng, reward_factory)
    }

    /// Resolve an action with a provided RNG (for deterministic testing)
    ///
    /// The reward factory runs exactly once, after the transition succeeds,
    /// and its value is returned unchanged next to the new state.
    pub fn execute_with_rng<R>(
        &self,
        state: &CombatState,
        action: &CombatAction,
        rng: &mut impl Rng,
        reward_factory: impl FnOnce(&CombatState) -> R,
    ) -> Result<(CombatState, R), ValidationError> {
        let mut next = state.clone();

        if self.ready_actor(&mut next, action.actor_id()) {
            match action {
                CombatAction::BasicAttack {
                    actor_id,
                    target_id,
                } => self.basic_attack(&mut next, actor_id, target_id, rng)?,
                CombatAction::SupportAbility {
                    actor_id,
                    target_id,
                } => self.support_ability(&mut next, actor_id, target_id.as_deref())?,
                CombatAction::SnackUse {
                    actor_id,
                    snack_item_id,
                    target_id,
                } => self.snack_use(&mut next, actor_id, snack_item_id, target_id.as_deref())?,
                CombatAction::SkillUse {
                    actor_id,
                    skill_id,
                    target_id,
                } => self.skill_use(&mut next, actor_id, skill_id, target_id.as_deref())?,
            }
        }

        let reward = reward_factory(&next);
        Ok((next, reward))
    }

    /// Check the actor exists and can act, logging a skipped turn if not
    fn ready_actor(&self, state: &mut CombatState, actor_id: &str) -> bool {
        match state.get(actor_id) {
            Some(actor) if actor.is_alive() => true,
            Some(_) => {
                skip(state, actor_id, "defeated");
                false
            }
            None => {
                skip(state, actor_id, "unknown actor");
                false
            }
        }
    }

    fn is_alive(state: &CombatState, id: &str) -> bool {
        state.get(id).is_some_and(|c| c.is_alive())
    }

    /// Check that `target_id` is a living opponent of the actor
    fn is_living_opponent(state: &CombatState, actor_id: &str, target_id: &str) -> bool {
        match (state.get(actor_id), state.get(target_id)) {
            (Some(actor), Some(target)) => target.is_alive() && target.side != actor.side,
            _ => false,
        }
    }

    /// Check that `target_id` is a living member of the actor's side
    fn is_living_ally(state: &CombatState, actor_id: &str, target_id: &str) -> bool {
        match (state.get(actor_id), state.get(target_id)) {
            (Some(actor), Some(target)) => target.is_alive() && target.side == actor.side,
            _ => false,
        }
    }

    /// Land a damaging hit from an action
    ///
    /// Consumes on-hit statuses of the target when `consume_marks` is set,
    /// adding their bonus to the hit, then applies the damage. A hit with an
    /// element the target is weak to shortens the attacker's cooldowns.
    fn land_hit(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        target_id: &str,
        amount: u32,
        element: Option<crate::types::Element>,
        consume_marks: bool,
    ) -> Result<(), ValidationError> {
        let bonus = if consume_marks {
            self.engine.consume_on_hit_in_place(state, target_id)
        } else {
            0
        };
        let weakness_hit = match (element, state.get(target_id)) {
            (Some(element), Some(target)) => target.is_weak_to(element),
            _ => false,
        };

        self.engine
            .damage_in_place(state, actor_id, target_id, amount.saturating_add(bonus), element)?;

        if weakness_hit {
            let reduction = self.engine.constants().weakness_cooldown_reduction;
            if let Some(actor) = state.get_mut(actor_id) {
                for cooldown in actor.cooldowns.values_mut() {
                    if let CooldownState::Turns(turns) = cooldown {
                        *turns = turns.saturating_sub(reduction);
                    }
                }
                actor.cooldowns.retain(|_, c| !c.is_ready());
            }
        }
        Ok(())
    }
}

fn skip(state: &mut CombatState, actor_id: &str, reason: impl Into<String>) {
    let reason = reason.into();
    tracing::warn!(actor = actor_id, %reason, "action skipped");
    state.push_log(CombatLogEntry::skipped(actor_id, reason));
}

/// Roll a percentage chance
fn roll(rng: &mut impl Rng, chance: f64) -> bool {
    rng.gen::<f64>() * 100.0 < chance
}
