//! CombatLogEntry - Append-only record of an encounter

use crate::types::{CombatStat, Element};
use serde::{Deserialize, Serialize};

/// One thing that happened during an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatLogEntry {
    Damage {
        source_id: String,
        target_id: String,
        amount: u32,
        element: Option<Element>,
    },
    Healed {
        source_id: String,
        target_id: String,
        amount: u32,
    },
    Missed {
        source_id: String,
        target_id: String,
    },
    TurnSkipped {
        actor_id: String,
        reason: String,
    },
    ElementBurst {
        element: Element,
        target_id: String,
        splash_amount: u32,
        affected_ids: Vec<String>,
    },
    StatusApplied {
        target_id: String,
        status_id: String,
        stacks: u32,
        duration: u32,
    },
    BuffApplied {
        target_id: String,
        stat: CombatStat,
        value: i32,
        duration: u32,
    },
    Staggered {
        target_id: String,
    },
}

impl CombatLogEntry {
    pub fn skipped(actor_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CombatLogEntry::TurnSkipped {
            actor_id: actor_id.into(),
            reason: reason.into(),
        }
    }

    /// Get a one-line summary string
    pub fn summary(&self) -> String {
        match self {
            CombatLogEntry::Damage {
                source_id,
                target_id,
                amount,
                element,
            } => match element {
                Some(e) => format!("{} hits {} for {} {} damage", source_id, target_id, amount, e),
                None => format!("{} hits {} for {} damage", source_id, target_id, amount),
            },
            CombatLogEntry::Healed {
                source_id,
                target_id,
                amount,
            } => {
                if source_id == target_id {
                    format!("{} recovers {} HP", target_id, amount)
                } else {
                    format!("{} heals {} for {} HP", source_id, target_id, amount)
                }
            }
            CombatLogEntry::Missed {
                source_id,
                target_id,
            } => format!("{} misses {}", source_id, target_id),
            CombatLogEntry::TurnSkipped { actor_id, reason } => {
                format!("{} skips the turn ({})", actor_id, reason)
            }
            CombatLogEntry::ElementBurst {
                element,
                target_id,
                splash_amount,
                affected_ids,
            } => {
                if affected_ids.is_empty() {
                    format!("{} burst on {}", element, target_id)
                } else {
                    format!(
                        "{} burst on {} splashes {} for {}",
                        element,
                        target_id,
                        affected_ids.join(", "),
                        splash_amount
                    )
                }
            }
            CombatLogEntry::StatusApplied {
                target_id,
                status_id,
                stacks,
                duration,
            } => format!(
                "{} gains {} x{} ({} turns)",
                target_id, status_id, stacks, duration
            ),
            CombatLogEntry::BuffApplied {
                target_id,
                stat,
                value,
                duration,
            } => format!("{} {:+} {} ({} turns)", target_id, value, stat, duration),
            CombatLogEntry::Staggered { target_id } => format!("{} is staggered", target_id),
        }
    }
}
