//! Basic attacks by weapon style

use super::{roll, skip, CombatActionProcessor};
use crate::error::ValidationError;
use crate::formulas;
use crate::state::{CombatLogEntry, CombatState, WeaponAttack, WeaponCharge};
use crate::types::CombatStat;
use rand::Rng;

impl CombatActionProcessor {
    pub(super) fn basic_attack(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        target_id: &str,
        rng: &mut impl Rng,
    ) -> Result<(), ValidationError> {
        if !Self::is_living_opponent(state, actor_id, target_id) {
            skip(state, actor_id, format!("invalid target {}", target_id));
            return Ok(());
        }
        let Some(actor) = state.get(actor_id) else {
            return Ok(());
        };

        let attack = actor.weapon.as_ref().map(|w| w.attack).unwrap_or_default();
        let element = actor.weapon.as_ref().and_then(|w| w.element);
        let attack_power = actor.effective_attack() as f64;

        match attack {
            WeaponAttack::Default => {
                self.single_target_hit(state, actor_id, target_id, element, rng)?;
            }
            WeaponAttack::AllEnemies { power_multiplier } => {
                let amount = scaled(attack_power, power_multiplier);
                for id in Self::living_side_of(state, target_id) {
                    // a burst earlier in the sweep may have finished this one
                    if Self::is_alive(state, &id) {
                        self.land_hit(state, actor_id, &id, amount, element, true)?;
                    }
                }
            }
            WeaponAttack::ChargedSplash {
                charge_turns,
                power_multiplier,
                splash_multiplier,
            } => {
                if actor.weapon_charge.is_none() {
                    let weapon_name = actor
                        .weapon
                        .as_ref()
                        .map(|w| w.name.clone())
                        .unwrap_or_default();
                    if let Some(actor) = state.get_mut(actor_id) {
                        actor.weapon_charge = Some(WeaponCharge {
                            turns_remaining: charge_turns,
                        });
                    }
                    tracing::debug!(actor = actor_id, turns = charge_turns, "weapon charging");
                    state.push_log(CombatLogEntry::skipped(actor_id, format!("charging {}", weapon_name)));
                    return Ok(());
                }

                let primary = scaled(attack_power, power_multiplier);
                let splash = scaled(attack_power, splash_multiplier);
                let others: Vec<String> = Self::living_side_of(state, target_id)
                    .into_iter()
                    .filter(|id| id != target_id)
                    .collect();

                self.land_hit(state, actor_id, target_id, primary, element, true)?;
                for id in &others {
                    if Self::is_alive(state, id) {
                        self.land_hit(state, actor_id, id, splash, element, true)?;
                    }
                }
                if let Some(actor) = state.get_mut(actor_id) {
                    actor.weapon_charge = None;
                }
                tracing::debug!(actor = actor_id, splashed = others.len(), "charged attack released");
            }
        }
        Ok(())
    }

    /// Hit-chance and crit rolls for a single target
    fn single_target_hit(
        &self,
        state: &mut CombatState,
        actor_id: &str,
        target_id: &str,
        element: Option<crate::types::Element>,
        rng: &mut impl Rng,
    ) -> Result<(), ValidationError> {
        let (Some(actor), Some(target)) = (state.get(actor_id), state.get(target_id)) else {
            return Ok(());
        };

        let chance = formulas::hit_chance(
            actor.effective(CombatStat::Accuracy),
            target.effective(CombatStat::Evasion),
            target.effective(CombatStat::Resistance),
        );
        if !roll(rng, chance) {
            state.push_log(CombatLogEntry::Missed {
                source_id: actor_id.to_string(),
                target_id: target_id.to_string(),
            });
            return Ok(());
        }

        let is_critical = roll(rng, actor.effective(CombatStat::CritChance));
        let mut damage = actor.effective_attack() as f64;
        if is_critical {
            damage *= self.engine.constants().crit_damage_multiplier;
            tracing::debug!(actor = actor_id, target = target_id, "critical hit");
        }

        self.land_hit(state, actor_id, target_id, damage.floor() as u32, element, true)
    }

    /// Ids of living combatants on the same side as `id`, including it
    pub(super) fn living_side_of(state: &CombatState, id: &str) -> Vec<String> {
        match state.get(id) {
            Some(anchor) => state.living(anchor.side).map(|c| c.id.clone()).collect(),
            None => Vec::new(),
        }
    }
}

pub(super) fn scaled(attack_power: f64, multiplier: f64) -> u32 {
    (attack_power * multiplier).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CombatAction, SupportAbilityTable};
    use crate::stat_block::StatBlock;
    use crate::state::{CombatSetup, CombatWeapon, Combatant};
    use crate::types::{Element, Side};
    use super::*;

    fn weapon(attack: WeaponAttack, element: Option<Element>) -> CombatWeapon {
        CombatWeapon {
            item_id: "test_weapon".to_string(),
            name: "Test Weapon".to_string(),
            weapon_type: "staff".to_string(),
            attack,
            element,
        }
    }

    fn attack(actor: &str, target: &str) -> CombatAction {
        CombatAction::BasicAttack {
            actor_id: actor.to_string(),
            target_id: target.to_string(),
        }
    }

    fn armed_skirmish(processor: &super::super::CombatActionProcessor, w: CombatWeapon) -> CombatState {
        let setup = CombatSetup::new(
            vec![
                Combatant::new("hero", "Hero", Side::Player, StatBlock::with_hp(100).strength(10).focus(50))
                    .with_weapon(w),
            ],
            vec![
                Combatant::new("slime_a", "Slime", Side::Enemy, StatBlock::with_hp(100)),
                Combatant::new("slime_b", "Slime", Side::Enemy, StatBlock::with_hp(60)),
                Combatant::new("slime_c", "Slime", Side::Enemy, StatBlock::with_hp(60)),
            ],
        );
        processor.engine().begin_encounter(&setup).unwrap()
    }

    #[test]
    fn test_default_attack_damage_is_attack_power_or_crit() {
        let processor = processor();
        let state = armed_skirmish(&processor, weapon(WeaponAttack::Default, None));
        let mut rng = rng();

        // focus 50: accuracy 105 vs evasion 5 -> always hits
        for _ in 0..20 {
            let (next, _) = processor
                .execute_with_rng(&state, &attack("hero", "slime_a"), &mut rng, |_| ())
                .unwrap();
            match next.log().last() {
                Some(CombatLogEntry::Damage { amount, source_id, .. }) => {
                    assert_eq!(source_id, "hero");
                    assert!(*amount == 20 || *amount == 40, "unexpected amount {}", amount);
                }
                other => panic!("expected damage, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_hit_chance_misses() {
        let processor = processor();
        let setup = CombatSetup::new(
            vec![Combatant::new("hero", "Hero", Side::Player, StatBlock::with_hp(100).strength(10))],
            vec![Combatant::new("wisp", "Wisp", Side::Enemy, StatBlock::with_hp(30).agility(700))],
        );
        let state = processor.engine().begin_encounter(&setup).unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &attack("hero", "wisp"), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(
            next.log(),
            &[CombatLogEntry::Missed {
                source_id: "hero".to_string(),
                target_id: "wisp".to_string(),
            }]
        );
        assert_eq!(next.get("wisp").unwrap().hp, 30);
    }

    #[test]
    fn test_weapon_element_feeds_stacks() {
        let processor = processor();
        let state = armed_skirmish(&processor, weapon(WeaponAttack::Default, Some(Element::Lightning)));

        let (next, _) = processor
            .execute_with_rng(&state, &attack("hero", "slime_a"), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("slime_a").unwrap().element_stack(Element::Lightning), 1);
    }

    #[test]
    fn test_all_enemies_hits_every_living_enemy() {
        let processor = processor();
        let state = armed_skirmish(
            &processor,
            weapon(WeaponAttack::AllEnemies { power_multiplier: 0.5 }, None),
        );
        let state = processor
            .engine()
            .apply_damage(&state, "hero", "slime_c", 60, None)
            .unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &attack("hero", "slime_b"), &mut rng(), |_| ())
            .unwrap();

        assert_eq!(next.get("slime_a").unwrap().hp, 90);
        assert_eq!(next.get("slime_b").unwrap().hp, 50);
        assert_eq!(next.get("slime_c").unwrap().hp, 0);
        let hits = next
            .log_since(state.log().len())
            .iter()
            .filter(|e| matches!(e, CombatLogEntry::Damage { .. }))
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_charged_splash_two_phases() {
        let processor = processor();
        let state = armed_skirmish(
            &processor,
            weapon(
                WeaponAttack::ChargedSplash {
                    charge_turns: 2,
                    power_multiplier: 1.5,
                    splash_multiplier: 0.5,
                },
                None,
            ),
        );

        let (charged, _) = processor
            .execute_with_rng(&state, &attack("hero", "slime_a"), &mut rng(), |_| ())
            .unwrap();
        for id in ["slime_a", "slime_b", "slime_c"] {
            assert_eq!(charged.get(id).unwrap().hp, state.get(id).unwrap().hp);
        }
        assert_eq!(
            charged.get("hero").unwrap().weapon_charge,
            Some(WeaponCharge { turns_remaining: 2 })
        );
        match charged.log().last() {
            Some(CombatLogEntry::TurnSkipped { actor_id, reason }) => {
                assert_eq!(actor_id, "hero");
                assert!(reason.contains("charging"));
            }
            other => panic!("expected skipped turn, got {:?}", other),
        }

        let (fired, _) = processor
            .execute_with_rng(&charged, &attack("hero", "slime_a"), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(fired.get("slime_a").unwrap().hp, 70);
        assert_eq!(fired.get("slime_b").unwrap().hp, 50);
        assert_eq!(fired.get("slime_c").unwrap().hp, 50);
        assert!(fired.get("hero").unwrap().weapon_charge.is_none());
    }

    #[test]
    fn test_attacking_ally_is_skipped() {
        let processor = processor();
        let state = skirmish(&processor);

        let (next, _) = processor
            .execute_with_rng(&state, &attack("hero", "sage"), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.combatants(), state.combatants());
        assert_eq!(
            next.log(),
            &[CombatLogEntry::skipped("hero", "invalid target sage")]
        );
    }

    #[test]
    fn test_target_lock_consumed_on_hit() {
        let processor = processor_with(SupportAbilityTable::with_defaults(), Vec::new(), Vec::new());
        let state = armed_skirmish(&processor, weapon(WeaponAttack::Default, None));
        let marked = processor
            .engine()
            .apply_status(&state, "slime_a", "target_lock", 99, 2)
            .unwrap();

        let (next, _) = processor
            .execute_with_rng(&marked, &attack("hero", "slime_a"), &mut rng(), |_| ())
            .unwrap();
        let slime = next.get("slime_a").unwrap();
        assert_eq!(slime.status("target_lock").unwrap().stacks, 1);
        // base 20 (or 40 on crit) plus 4 per stack
        assert!(slime.hp == 72 || slime.hp == 52, "unexpected hp {}", slime.hp);
    }

    #[test]
    fn test_sweep_skips_enemies_finished_by_a_burst() {
        let processor = processor();
        let setup = CombatSetup::new(
            vec![
                Combatant::new("hero", "Hero", Side::Player, StatBlock::with_hp(100).strength(10)).with_weapon(
                    weapon(WeaponAttack::AllEnemies { power_multiplier: 0.05 }, Some(Element::Fire)),
                ),
            ],
            vec![
                Combatant::new("a", "Brute", Side::Enemy, StatBlock::with_hp(200)),
                Combatant::new("b", "Imp", Side::Enemy, StatBlock::with_hp(5)),
            ],
        );
        let state = processor.engine().begin_encounter(&setup).unwrap();
        let state = processor.engine().apply_damage(&state, "hero", "a", 1, Some(Element::Fire)).unwrap();
        let state = processor.engine().apply_damage(&state, "hero", "a", 1, Some(Element::Fire)).unwrap();

        let (next, _) = processor
            .execute_with_rng(&state, &attack("hero", "a"), &mut rng(), |_| ())
            .unwrap();

        let imp = next.get("b").unwrap();
        assert_eq!(imp.hp, 0);
        assert_eq!(imp.element_stack(Element::Fire), 0);
        let new_entries = next.log_since(state.log().len());
        assert!(new_entries
            .iter()
            .any(|e| matches!(e, CombatLogEntry::ElementBurst { affected_ids, .. } if affected_ids == &["b".to_string()])));
        assert!(!new_entries
            .iter()
            .any(|e| matches!(e, CombatLogEntry::Damage { target_id, .. } if target_id == "b")));
    }

    #[test]
    fn test_charged_splash_skips_enemies_finished_by_a_burst() {
        let processor = processor();
        let setup = CombatSetup::new(
            vec![
                Combatant::new("hero", "Hero", Side::Player, StatBlock::with_hp(100).strength(10)).with_weapon(
                    weapon(
                        WeaponAttack::ChargedSplash {
                            charge_turns: 1,
                            power_multiplier: 0.05,
                            splash_multiplier: 0.05,
                        },
                        Some(Element::Fire),
                    ),
                ),
            ],
            vec![
                Combatant::new("a", "Brute", Side::Enemy, StatBlock::with_hp(200)),
                Combatant::new("b", "Imp", Side::Enemy, StatBlock::with_hp(5)),
            ],
        );
        let state = processor.engine().begin_encounter(&setup).unwrap();
        let state = processor.engine().apply_damage(&state, "hero", "a", 1, Some(Element::Fire)).unwrap();
        let state = processor.engine().apply_damage(&state, "hero", "a", 1, Some(Element::Fire)).unwrap();

        let (charged, _) = processor
            .execute_with_rng(&state, &attack("hero", "a"), &mut rng(), |_| ())
            .unwrap();
        let (fired, _) = processor
            .execute_with_rng(&charged, &attack("hero", "a"), &mut rng(), |_| ())
            .unwrap();

        assert_eq!(fired.get("b").unwrap().hp, 0);
        assert_eq!(fired.get("b").unwrap().element_stack(Element::Fire), 0);
        assert!(!fired
            .log_since(charged.log().len())
            .iter()
            .any(|e| matches!(e, CombatLogEntry::Damage { target_id, .. } if target_id == "b")));
        assert!(fired.get("hero").unwrap().weapon_charge.is_none());
    }

    #[test]
    fn test_mark_bonus_on_maximal_attack_saturates() {
        let processor = processor();
        let setup = CombatSetup::new(
            vec![Combatant::new(
                "titan",
                "Titan",
                Side::Player,
                StatBlock::with_hp(100).strength(u32::MAX).focus(50),
            )],
            vec![Combatant::new("slime", "Slime", Side::Enemy, StatBlock::with_hp(100))],
        );
        let state = processor.engine().begin_encounter(&setup).unwrap();
        let marked = processor
            .engine()
            .apply_status(&state, "slime", "target_lock", 99, 2)
            .unwrap();

        let (next, _) = processor
            .execute_with_rng(&marked, &attack("titan", "slime"), &mut rng(), |_| ())
            .unwrap();
        assert_eq!(next.get("slime").unwrap().hp, 0);
        assert!(next.log().iter().any(|e| matches!(
            e,
            CombatLogEntry::Damage { amount, .. } if *amount == u32::MAX
        )));
    }
}
