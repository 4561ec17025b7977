//! Snack use - Consumable items with heal, buff and damage payloads

use super::{skip, CombatActionProcessor};
use crate::error::ValidationError;
use crate::state::{BuffEffect, CombatState};
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Who an item's buffs and heals land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    #[serde(rename = "self")]
    Actor,
    Enemy,
    Ally,
    /// Every living member of the actor's side
    Party,
}

/// Effect payload carried by a consumable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(default)]
    pub restore_hp: u32,
    /// Treated as extra hp restoration in combat
    #[serde(default)]
    pub restore_rp: u32,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub single_buff: Option<BuffEffect>,
    #[serde(default)]
    pub buffs: Vec<BuffEffect>,
    #[serde(default)]
    pub target: Option<EffectTarget>,
}

impl ItemEffect {
    pub fn heal_amount(&self) -> u32 {
        self.restore_hp.saturating_add(self.restore_rp)
    }

    /// All buffs the item grants
    pub fn all_buffs(&self) -> impl Iterator<Item = BuffEffect> + '_ {
        self.single_buff.iter().chain(self.buffs.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.heal_amount() == 0 && self.damage == 0 && self.all_buffs().next().is_none()
    }
}

/// Item metadata as returned by the item lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
}

impl CombatActionProcessor {
    pub(super) fn snack_use(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        item_id: &str,
        target_id: Option<&str>,
    ) -> Result<(), ValidationError> {
        let Some(item) = (self.item_lookup)(item_id) else {
            skip(state, actor_id, format!("unknown item {}", item_id));
            return Ok(());
        };
        let effect = match item.effect {
            Some(effect) if !effect.is_empty() => effect,
            _ => {
                skip(state, actor_id, "no effect");
                return Ok(());
            }
        };

        let heal_targets = if effect.heal_amount() > 0 {
            match Self::resolve_heal_targets(state, actor_id, effect.target, target_id) {
                Some(ids) => ids,
                None => return Self::invalid_snack_target(state, actor_id, target_id),
            }
        } else {
            Vec::new()
        };
        let buff_targets = if effect.all_buffs().next().is_some() {
            match Self::resolve_buff_targets(state, actor_id, effect.target, target_id) {
                Some(ids) => ids,
                None => return Self::invalid_snack_target(state, actor_id, target_id),
            }
        } else {
            Vec::new()
        };
        let damage_target = if effect.damage > 0 {
            match target_id.filter(|id| Self::is_living_opponent(state, actor_id, id)) {
                Some(id) => Some(id.to_string()),
                None => return Self::invalid_snack_target(state, actor_id, target_id),
            }
        } else {
            None
        };

        tracing::debug!(actor = actor_id, item = %item.id, "snack used");
        for id in &heal_targets {
            self.engine
                .heal_in_place(state, actor_id, id, effect.heal_amount())?;
        }
        for id in &buff_targets {
            for buff in effect.all_buffs() {
                self.engine.buff_in_place(state, id, buff)?;
            }
        }
        if let Some(id) = damage_target {
            self.engine
                .damage_in_place(state, actor_id, &id, effect.damage, effect.element)?;
        }
        Ok(())
    }

    fn resolve_heal_targets(
        state: &CombatState,
        actor_id: &str,
        target: Option<EffectTarget>,
        target_id: Option<&str>,
    ) -> Option<Vec<String>> {
        let side = state.get(actor_id)?.side;
        match (target, target_id) {
            (Some(EffectTarget::Party), _) => Some(state.living(side).map(|c| c.id.clone()).collect()),
            (Some(EffectTarget::Actor), _) | (_, None) => Some(vec![actor_id.to_string()]),
            (_, Some(id)) => state
                .get(id)
                .filter(|c| c.is_alive())
                .map(|c| vec![c.id.clone()]),
        }
    }

    fn resolve_buff_targets(
        state: &CombatState,
        actor_id: &str,
        target: Option<EffectTarget>,
        target_id: Option<&str>,
    ) -> Option<Vec<String>> {
        let side = state.get(actor_id)?.side;
        match target {
            Some(EffectTarget::Enemy) => {
                let id = target_id?;
                Self::is_living_opponent(state, actor_id, id).then(|| vec![id.to_string()])
            }
            Some(EffectTarget::Ally) => match target_id {
                Some(id) if Self::is_living_ally(state, actor_id, id) => Some(vec![id.to_string()]),
                _ => Some(vec![actor_id.to_string()]),
            },
            Some(EffectTarget::Party) => Some(state.living(side).map(|c| c.id.clone()).collect()),
            Some(EffectTarget::Actor) | None => Some(vec![actor_id.to_string()]),
        }
    }

    fn invalid_snack_target(
        state: &mut CombatState,
        actor_id: &str,
        target_id: Option<&str>,
    ) -> Result<(), ValidationError> {
        skip(
            state,
            actor_id,
            format!("invalid target {}", target_id.unwrap_or("none")),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CombatAction, SupportAbilityTable};
    use super::*;
    use crate::stat_block::StatBlock;
    use crate::state::{ActiveBuff, CombatLogEntry, CombatSetup, Combatant};
    use crate::types::{CombatStat, Side};

    fn item(id: &str, effect: ItemEffect) -> Item {
        Item {
            id: id.to_string(),
            name: id.to_string(),
            effect: Some(effect),
        }
    }

    fn snack_processor() -> CombatActionProcessor {
        processor_with(
            SupportAbilityTable::new(),
            Vec::new(),
            vec![
                item(
                    "party_platter",
                    ItemEffect {
                        restore_hp: 20,
                        restore_rp: 10,
                        target: Some(EffectTarget::Party),
                        ..Default::default()
                    },
                ),
                item(
                    "energy_bar",
                    ItemEffect {
                        single_buff: Some(BuffEffect::new(CombatStat::Attack, 6, 2)),
                        target: Some(EffectTarget::Actor),
                        ..Default::default()
                    },
                ),
                item(
                    "pepper_dust",
                    ItemEffect {
                        buffs: vec![BuffEffect::new(CombatStat::Accuracy, -10, 2)],
                        target: Some(EffectTarget::Enemy),
                        ..Default::default()
                    },
                ),
                item(
                    "fire_cracker",
                    ItemEffect {
                        damage: 15,
                        element: Some(Element::Fire),
                        target: Some(EffectTarget::Enemy),
                        ..Default::default()
                    },
                ),
                Item {
                    id: "paper_cup".to_string(),
                    name: "Paper Cup".to_string(),
                    effect: None,
                },
            ],
        )
    }

    fn snack(actor: &str, item_id: &str, target: Option<&str>) -> CombatAction {
        CombatAction::SnackUse {
            actor_id: actor.to_string(),
            snack_item_id: item_id.to_string(),
            target_id: target.map(str::to_string),
        }
    }

    #[test]
    fn test_party_heal_clamps_each_member() {
        let processor = snack_processor();
        let mut state = skirmish(&processor);
        state = processor.engine().apply_damage(&state, "slime_a", "hero", 50, None).unwrap();
        state = processor.engine().apply_damage(&state, "slime_a", "sage", 5, None).unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &snack("sage", "party_platter", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("hero").unwrap().hp, 80);
        assert_eq!(next.get("sage").unwrap().hp, 80);
        assert_eq!(next.get("slime_a").unwrap().hp, 100);
    }

    #[test]
    fn test_party_heal_skips_defeated() {
        let processor = snack_processor();
        let state = skirmish(&processor);
        let state = processor.engine().apply_damage(&state, "slime_a", "hero", 500, None).unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &snack("sage", "party_platter", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("hero").unwrap().hp, 0);
    }

    #[test]
    fn test_self_buff_never_reaches_target() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "energy_bar", Some("slime_a")), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(
            next.get("hero").unwrap().buffs,
            vec![ActiveBuff::new(BuffEffect::new(CombatStat::Attack, 6, 2))]
        );
        assert!(next.get("slime_a").unwrap().buffs.is_empty());
    }

    #[test]
    fn test_enemy_buff_never_reaches_actor() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "pepper_dust", Some("slime_b")), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("slime_b").unwrap().buffs.len(), 1);
        assert!(next.get("hero").unwrap().buffs.is_empty());
    }

    #[test]
    fn test_damage_snack_feeds_stacks() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "fire_cracker", Some("slime_a")), &mut rng(), |_| ())
            .unwrap();
        let slime = next.get("slime_a").unwrap();
        assert_eq!(slime.hp, 85);
        assert_eq!(slime.element_stack(Element::Fire), 1);
        assert_eq!(
            next.log(),
            &[CombatLogEntry::Damage {
                source_id: "hero".to_string(),
                target_id: "slime_a".to_string(),
                amount: 15,
                element: Some(Element::Fire),
            }]
        );
    }

    #[test]
    fn test_damage_snack_needs_enemy_target() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "fire_cracker", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.combatants(), state.combatants());
        assert_eq!(next.log(), &[CombatLogEntry::skipped("hero", "invalid target none")]);
    }

    #[test]
    fn test_item_without_effect() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "paper_cup", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.log(), &[CombatLogEntry::skipped("hero", "no effect")]);
    }

    #[test]
    fn test_unknown_item() {
        let processor = snack_processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "mystery_meat", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.combatants(), state.combatants());
        assert_eq!(
            next.log(),
            &[CombatLogEntry::skipped("hero", "unknown item mystery_meat")]
        );
    }

    #[test]
    fn test_heal_defaults_to_actor() {
        let processor = processor_with(
            SupportAbilityTable::new(),
            Vec::new(),
            vec![item(
                "rice_ball",
                ItemEffect {
                    restore_hp: 15,
                    ..Default::default()
                },
            )],
        );
        let setup = CombatSetup::new(
            vec![Combatant::new("hero", "Hero", Side::Player, StatBlock::with_hp(100))],
            vec![Combatant::new("slime", "Slime", Side::Enemy, StatBlock::with_hp(40))],
        );
        let state = processor.engine().begin_encounter(&setup).unwrap();
        let state = processor.engine().apply_damage(&state, "slime", "hero", 30, None).unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &snack("hero", "rice_ball", None), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("hero").unwrap().hp, 85);
    }

    #[test]
    fn test_item_effect_from_json() {
        let json = r#"{
            "id": "chili_bun",
            "name": "Chili Bun",
            "effect": {
                "restore_hp": 10,
                "single_buff": {"stat": "attack", "value": 4, "duration": 3},
                "target": "self"
            }
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        let effect = item.effect.unwrap();
        assert_eq!(effect.heal_amount(), 10);
        assert_eq!(effect.target, Some(EffectTarget::Actor));
        assert_eq!(effect.all_buffs().count(), 1);
    }
}
