//! Support abilities - Per-character effect lists resolved by one dispatcher

use super::{skip, CombatActionProcessor};
use crate::error::ValidationError;
use crate::state::{BuffEffect, CombatState};
use crate::types::CombatStat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who a single ability effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTarget {
    #[serde(rename = "self")]
    Actor,
    /// The action's target, which must be a living opponent
    Target,
    /// The action's target if it is a living ally, otherwise the actor
    Ally,
    AllAllies,
    AllEnemies,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    Buff {
        stat: CombatStat,
        value: i32,
        duration: u32,
    },
    Status {
        status_id: String,
        duration: u32,
        #[serde(default = "default_stacks")]
        stacks: u32,
        /// Add onto existing stacks instead of replacing them
        #[serde(default)]
        additive: bool,
        #[serde(default)]
        max_stacks: Option<u32>,
    },
    Heal {
        amount: u32,
    },
}

fn default_stacks() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEffect {
    pub target: AbilityTarget,
    pub kind: EffectKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportAbility {
    /// Character identity that owns the ability
    pub character_id: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<AbilityEffect>,
}

/// Character id to support ability lookup
#[derive(Debug, Clone, Default)]
pub struct SupportAbilityTable {
    abilities: HashMap<String, SupportAbility>,
}

impl SupportAbilityTable {
    pub fn new() -> Self {
        SupportAbilityTable {
            abilities: HashMap::new(),
        }
    }

    /// Build a table, one ability per character
    pub fn from_abilities(
        abilities: impl IntoIterator<Item = SupportAbility>,
    ) -> Result<Self, crate::config::ConfigError> {
        let mut table = Self::new();
        for ability in abilities {
            if table.abilities.contains_key(&ability.character_id) {
                return Err(crate::config::ConfigError::ValidationError(format!(
                    "character '{}' has more than one support ability",
                    ability.character_id
                )));
            }
            table.register(ability);
        }
        Ok(table)
    }

    pub fn register(&mut self, ability: SupportAbility) {
        self.abilities.insert(ability.character_id.clone(), ability);
    }

    pub fn get(&self, character_id: &str) -> Option<&SupportAbility> {
        self.abilities.get(character_id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Bundled rogue, guardian, medic and sniper abilities
    pub fn with_defaults() -> Self {
        crate::config::default_support_abilities()
    }
}

impl CombatActionProcessor {
    pub(super) fn support_ability(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        target_id: Option<&str>,
    ) -> Result<(), ValidationError> {
        let Some(character) = state.get(actor_id).map(|a| a.character_key().to_string()) else {
            return Ok(());
        };
        let Some(ability) = self.support_abilities.get(&character) else {
            skip(state, actor_id, format!("no support ability for {}", character));
            return Ok(());
        };

        let mut plan = Vec::with_capacity(ability.effects.len());
        for effect in &ability.effects {
            match Self::resolve_ability_targets(state, actor_id, effect.target, target_id) {
                Some(ids) => plan.push((&effect.kind, ids)),
                None => {
                    skip(state, actor_id, format!("invalid target for {}", ability.name));
                    return Ok(());
                }
            }
        }

        if plan.iter().all(|(_, ids)| ids.is_empty()) {
            skip(state, actor_id, format!("no targets for {}", ability.name));
            return Ok(());
        }

        tracing::debug!(actor = actor_id, ability = %ability.id, "support ability");
        for (kind, ids) in plan {
            for id in ids {
                self.apply_ability_effect(state, actor_id, &id, kind)?;
            }
        }
        Ok(())
    }

    fn resolve_ability_targets(
        state: &CombatState,
        actor_id: &str,
        target: AbilityTarget,
        target_id: Option<&str>,
    ) -> Option<Vec<String>> {
        let side = state.get(actor_id)?.side;
        match target {
            AbilityTarget::Actor => Some(vec![actor_id.to_string()]),
            AbilityTarget::Target => {
                let id = target_id?;
                Self::is_living_opponent(state, actor_id, id).then(|| vec![id.to_string()])
            }
            AbilityTarget::Ally => match target_id {
                Some(id) if Self::is_living_ally(state, actor_id, id) => Some(vec![id.to_string()]),
                _ => Some(vec![actor_id.to_string()]),
            },
            AbilityTarget::AllAllies => Some(state.living(side).map(|c| c.id.clone()).collect()),
            AbilityTarget::AllEnemies => Some(
                state
                    .living(side.opposite())
                    .map(|c| c.id.clone())
                    .collect(),
            ),
        }
    }

    fn apply_ability_effect(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        target_id: &str,
        kind: &EffectKind,
    ) -> Result<(), ValidationError> {
        match kind {
            EffectKind::Buff {
                stat,
                value,
                duration,
            } => self
                .engine
                .buff_in_place(state, target_id, BuffEffect::new(*stat, *value, *duration)),
            EffectKind::Status {
                status_id,
                duration,
                stacks,
                additive,
                max_stacks,
            } => {
                let mut total = *stacks;
                if *additive {
                    let existing = state
                        .get(target_id)
                        .and_then(|c| c.status(status_id))
                        .map_or(0, |s| s.stacks);
                    total = existing.saturating_add(*stacks);
                }
                if let Some(max) = max_stacks {
                    total = total.min(*max);
                }
                self.engine
                    .status_in_place(state, target_id, status_id, *duration, total)
            }
            EffectKind::Heal { amount } => self
                .engine
                .heal_in_place(state, actor_id, target_id, *amount)
                .map(|_| ()),
        }
    }
}
