//! Scripted encounter runner

use crate::scenario::{Loadout, Scenario};
use combat_core::{
    CombatAction, CombatActionProcessor, CombatEngine, CombatState, EffectTarget,
    EncounterOutcome, Side, SkillTarget, SupportAbilityTable, TurnOrder, ValidationError,
};
use rand::Rng;
use std::collections::HashMap;

/// Result of a finished (or abandoned) encounter
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub rounds: u32,
    pub outcome: EncounterOutcome,
    pub state: CombatState,
}

/// Drives one encounter with a fixed decision policy
///
/// Players snack below 40% hp, open with their support ability, then use
/// any ready skill, and otherwise attack the weakest opponent. Enemies
/// always attack the weakest player.
pub struct Simulation {
    processor: CombatActionProcessor,
    skill_targets: HashMap<String, SkillTarget>,
    snack_targets: HashMap<String, EffectTarget>,
    loadouts: HashMap<String, Loadout>,
    max_rounds: u32,
}

impl Simulation {
    pub fn new(scenario: &Scenario, engine: CombatEngine, abilities: SupportAbilityTable) -> Self {
        let skills = scenario.skills.clone();
        let items = scenario.items.clone();
        let skill_targets = scenario
            .skills
            .values()
            .map(|s| (s.id.clone(), s.target))
            .collect();
        let snack_targets = scenario
            .items
            .values()
            .filter_map(|i| Some((i.id.clone(), i.effect.as_ref()?.target?)))
            .collect();

        Simulation {
            processor: CombatActionProcessor::new(
                engine,
                abilities,
                move |id| skills.get(id).cloned(),
                move |id| items.get(id).cloned(),
            ),
            skill_targets,
            snack_targets,
            loadouts: scenario.loadouts.clone(),
            max_rounds: scenario.max_rounds,
        }
    }

    pub fn processor(&self) -> &CombatActionProcessor {
        &self.processor
    }

    pub fn run(
        &mut self,
        state: CombatState,
        rng: &mut impl Rng,
    ) -> Result<SimulationReport, ValidationError> {
        let mut state = state;
        let mut outcome = state.outcome();
        let mut rounds = 0;

        while outcome == EncounterOutcome::Ongoing && rounds < self.max_rounds {
            rounds += 1;
            tracing::info!(round = rounds, "round start");

            let mut order = TurnOrder::for_round(&state, self.processor.engine().constants());
            while let Some(actor_id) = order.next_actor(&state) {
                let Some(action) = self.choose_action(&state, &actor_id, rounds) else {
                    continue;
                };
                let (next, after) =
                    self.processor
                        .execute_with_rng(&state, &action, rng, |s| s.outcome())?;
                state = next;
                outcome = after;
                if outcome != EncounterOutcome::Ongoing {
                    break;
                }
            }

            if outcome == EncounterOutcome::Ongoing {
                state = self.processor.engine().tick_end_of_turn(&state);
                outcome = state.outcome();
            }
        }

        if outcome == EncounterOutcome::Ongoing {
            tracing::warn!(rounds, "round limit reached");
        }
        Ok(SimulationReport {
            rounds,
            outcome,
            state,
        })
    }

    fn choose_action(&mut self, state: &CombatState, actor_id: &str, round: u32) -> Option<CombatAction> {
        let actor = state.get(actor_id)?;
        let focus = weakest(state, actor.side.opposite())?;

        if actor.side == Side::Enemy {
            return Some(CombatAction::BasicAttack {
                actor_id: actor_id.to_string(),
                target_id: focus,
            });
        }

        let loadout = self.loadouts.entry(actor_id.to_string()).or_default();
        if below_snack_threshold(actor.hp, actor.max_hp()) && !loadout.snacks.is_empty() {
            let snack = loadout.snacks.remove(0);
            let target_id = match self.snack_targets.get(&snack) {
                Some(EffectTarget::Enemy) => Some(focus),
                _ => None,
            };
            return Some(CombatAction::SnackUse {
                actor_id: actor_id.to_string(),
                snack_item_id: snack,
                target_id,
            });
        }

        if round == 1
            && self
                .processor
                .support_abilities()
                .get(actor.character_key())
                .is_some()
        {
            return Some(CombatAction::SupportAbility {
                actor_id: actor_id.to_string(),
                target_id: Some(focus),
            });
        }

        if let Some(skill) = loadout.skills.iter().find(|s| actor.cooldown(s).is_none()) {
            let target_id = match self.skill_targets.get(skill) {
                Some(target) if target.is_offensive() => Some(focus),
                _ => None,
            };
            return Some(CombatAction::SkillUse {
                actor_id: actor_id.to_string(),
                skill_id: skill.clone(),
                target_id,
            });
        }

        Some(CombatAction::BasicAttack {
            actor_id: actor_id.to_string(),
            target_id: focus,
        })
    }
}

/// Under 40% of max hp
fn below_snack_threshold(hp: u32, max_hp: u32) -> bool {
    u64::from(hp) * 10 < u64::from(max_hp) * 4
}

/// Living combatant with the least hp on a side
fn weakest(state: &CombatState, side: Side) -> Option<String> {
    state
        .living(side)
        .min_by_key(|c| (c.hp, c.id.clone()))
        .map(|c| c.id.clone())
}
