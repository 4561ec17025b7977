//! Turn order - Per-round speed queue

use crate::config::CombatConstants;
use crate::state::CombatState;
use crate::types::{CombatStat, Side};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Acting order for one round
///
/// Built from the living combatants at the start of the round, fastest
/// first. Combatants that fall or get staggered while waiting lose their
/// place for the rest of the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    queue: VecDeque<String>,
    stagger_status_id: String,
}

impl TurnOrder {
    /// Order living combatants by effective speed
    ///
    /// Ties go to the player side, then to the lower id.
    pub fn for_round(state: &CombatState, constants: &CombatConstants) -> Self {
        let mut entries: Vec<(f64, Side, &str)> = state
            .combatants()
            .values()
            .filter(|c| c.is_alive())
            .map(|c| (c.effective(CombatStat::Speed), c.side, c.id.as_str()))
            .collect();

        entries.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| side_rank(a.1).cmp(&side_rank(b.1)))
                .then_with(|| a.2.cmp(b.2))
        });

        TurnOrder {
            queue: entries.into_iter().map(|(_, _, id)| id.to_string()).collect(),
            stagger_status_id: constants.stagger_status_id.clone(),
        }
    }

    /// Pop the next combatant able to act
    pub fn next_actor(&mut self, state: &CombatState) -> Option<String> {
        while let Some(id) = self.queue.pop_front() {
            match state.get(&id) {
                Some(c) if c.is_alive() && !c.has_status(&self.stagger_status_id) => return Some(id),
                Some(_) => tracing::debug!(actor = %id, "turn forfeited"),
                None => {}
            }
        }
        None
    }

    /// Ids still waiting this round, in order
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

fn side_rank(side: Side) -> u8 {
    match side {
        Side::Player => 0,
        Side::Enemy => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CombatEngine;
    use crate::stat_block::StatBlock;
    use crate::state::{CombatSetup, Combatant};

    fn make_state(engine: &CombatEngine) -> CombatState {
        let setup = CombatSetup::new(
            vec![
                Combatant::new("archer", "Archer", Side::Player, StatBlock::with_hp(60).speed(10).agility(5)),
                Combatant::new("knight", "Knight", Side::Player, StatBlock::with_hp(90).speed(8)),
            ],
            vec![
                Combatant::new("hound", "Hound", Side::Enemy, StatBlock::with_hp(40).speed(20)),
                Combatant::new("brute", "Brute", Side::Enemy, StatBlock::with_hp(120).speed(8)),
            ],
        );
        engine.begin_encounter(&setup).unwrap()
    }

    #[test]
    fn test_order_by_speed_with_ties() {
        let engine = CombatEngine::with_defaults();
        let state = make_state(&engine);
        let order = TurnOrder::for_round(&state, engine.constants());

        // knight and brute tie at 8: player side first
        assert_eq!(
            order.remaining().collect::<Vec<_>>(),
            vec!["hound", "archer", "knight", "brute"]
        );
    }

    #[test]
    fn test_speed_buffs_reorder() {
        let engine = CombatEngine::with_defaults();
        let state = make_state(&engine);
        let state = engine
            .apply_buff(&state, "brute", crate::state::BuffEffect::new(CombatStat::Speed, 30, 1))
            .unwrap();

        let order = TurnOrder::for_round(&state, engine.constants());
        assert_eq!(order.remaining().next(), Some("brute"));
    }

    #[test]
    fn test_next_actor_skips_defeated_and_staggered() {
        let engine = CombatEngine::with_defaults();
        let state = make_state(&engine);
        let mut order = TurnOrder::for_round(&state, engine.constants());

        assert_eq!(order.next_actor(&state), Some("hound".to_string()));

        let state = engine.apply_damage(&state, "hound", "archer", 999, None).unwrap();
        let state = engine.apply_status(&state, "knight", "staggered", 1, 1).unwrap();

        assert_eq!(order.next_actor(&state), Some("brute".to_string()));
        assert!(order.is_finished());
        assert_eq!(order.next_actor(&state), None);
    }

    #[test]
    fn test_defeated_excluded_from_round() {
        let engine = CombatEngine::with_defaults();
        let state = make_state(&engine);
        let state = engine.apply_damage(&state, "archer", "hound", 999, None).unwrap();

        let order = TurnOrder::for_round(&state, engine.constants());
        assert!(order.remaining().all(|id| id != "hound"));
        assert_eq!(order.remaining().count(), 3);
    }
}
