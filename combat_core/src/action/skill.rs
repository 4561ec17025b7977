//! Skill use - Cooldown-gated active skills

use super::attack::scaled;
use super::{skip, CombatActionProcessor};
use crate::config::ConfigError;
use crate::error::ValidationError;
use crate::state::{BuffEffect, CombatState, CooldownState};
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Longest cooldown a skill may declare
pub const MAX_COOLDOWN_TURNS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTarget {
    #[default]
    SingleEnemy,
    AllEnemies,
    #[serde(rename = "self")]
    Actor,
    /// Given living ally, otherwise the actor
    Ally,
}

impl SkillTarget {
    pub fn is_offensive(&self) -> bool {
        matches!(self, SkillTarget::SingleEnemy | SkillTarget::AllEnemies)
    }
}

/// Status applied to every target of a skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStatus {
    pub status_id: String,
    pub duration: u32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
}

fn default_stacks() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target: SkillTarget,
    /// Multiplier on attack power; 0 for skills that deal no damage
    #[serde(default)]
    pub power_multiplier: f64,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub statuses: Vec<SkillStatus>,
    #[serde(default)]
    pub buffs: Vec<BuffEffect>,
    #[serde(default)]
    pub heal: u32,
    #[serde(default)]
    pub cooldown_turns: u32,
    #[serde(default)]
    pub once_per_battle: bool,
}

impl SkillDefinition {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cooldown_turns > MAX_COOLDOWN_TURNS {
            return Err(ConfigError::ValidationError(format!(
                "skill '{}' cooldown {} exceeds {} turns",
                self.id, self.cooldown_turns, MAX_COOLDOWN_TURNS
            )));
        }
        if self.power_multiplier < 0.0 || !self.power_multiplier.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "skill '{}' has invalid power multiplier {}",
                self.id, self.power_multiplier
            )));
        }
        if self.power_multiplier > 0.0 && !self.target.is_offensive() {
            return Err(ConfigError::ValidationError(format!(
                "skill '{}' deals damage but does not target enemies",
                self.id
            )));
        }
        Ok(())
    }

    /// Cooldown entered after use, if any
    pub fn cooldown_after_use(&self) -> Option<CooldownState> {
        if self.once_per_battle {
            Some(CooldownState::Spent)
        } else if self.cooldown_turns > 0 {
            Some(CooldownState::Turns(self.cooldown_turns))
        } else {
            None
        }
    }
}

impl CombatActionProcessor {
    pub(super) fn skill_use(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        skill_id: &str,
        target_id: Option<&str>,
    ) -> Result<(), ValidationError> {
        let Some(skill) = (self.skill_lookup)(skill_id) else {
            skip(state, actor_id, format!("unknown skill {}", skill_id));
            return Ok(());
        };
        let Some(actor) = state.get(actor_id) else {
            return Ok(());
        };
        if actor.cooldown(&skill.id).is_some() {
            skip(state, actor_id, format!("{} on cooldown", skill.name));
            return Ok(());
        }

        let side = actor.side;
        let amount = scaled(
            actor.effective_attack() as f64 * actor.stats.skill_potency(),
            skill.power_multiplier,
        );
        let targets: Vec<String> = match skill.target {
            SkillTarget::SingleEnemy => match target_id {
                Some(id) if Self::is_living_opponent(state, actor_id, id) => vec![id.to_string()],
                _ => {
                    skip(
                        state,
                        actor_id,
                        format!("invalid target {}", target_id.unwrap_or("none")),
                    );
                    return Ok(());
                }
            },
            SkillTarget::AllEnemies => state
                .living(side.opposite())
                .map(|c| c.id.clone())
                .collect(),
            SkillTarget::Actor => vec![actor_id.to_string()],
            SkillTarget::Ally => match target_id {
                Some(id) if Self::is_living_ally(state, actor_id, id) => vec![id.to_string()],
                _ => vec![actor_id.to_string()],
            },
        };

        if targets.is_empty() {
            skip(state, actor_id, format!("no targets for {}", skill.name));
            return Ok(());
        }

        tracing::debug!(actor = actor_id, skill = %skill.id, targets = targets.len(), "skill used");
        for id in &targets {
            if !Self::is_alive(state, id) {
                continue;
            }
            if skill.power_multiplier > 0.0 {
                // marks only react to basic attacks
                self.land_hit(state, actor_id, id, amount, skill.element, false)?;
            }
            for status in &skill.statuses {
                self.engine
                    .status_in_place(state, id, &status.status_id, status.duration, status.stacks)?;
            }
            for buff in &skill.buffs {
                self.engine.buff_in_place(state, id, *buff)?;
            }
            if skill.heal > 0 {
                self.engine.heal_in_place(state, actor_id, id, skill.heal)?;
            }
        }

        if let Some(cooldown) = skill.cooldown_after_use() {
            if let Some(actor) = state.get_mut(actor_id) {
                actor.cooldowns.insert(skill.id.clone(), cooldown);
            }
        }
        Ok(())
    }
}
