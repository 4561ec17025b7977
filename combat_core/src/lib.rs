//! combat_core - Turn-based combat resolution for party battles
//!
//! This library provides:
//! - CombatEngine: Pure transitions (damage, heals, statuses, buffs, ticks)
//! - CombatActionProcessor: Resolves issued actions into engine calls
//! - StatusRegistry: Content-driven status definitions
//! - TurnOrder: Speed-ordered acting queue per round
//! - Formulas: Derived combat numbers from raw attributes

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod formulas;
pub mod stat_block;
pub mod state;
pub mod status;
pub mod turn_order;
pub mod types;

// Re-export core types for convenience
pub use action::{
    AbilityEffect, AbilityTarget, CombatAction, CombatActionProcessor, EffectKind, EffectTarget,
    Item, ItemEffect, SkillDefinition, SkillStatus, SkillTarget, SupportAbility,
    SupportAbilityTable,
};
pub use config::{CombatConstants, ConfigError};
pub use engine::CombatEngine;
pub use error::ValidationError;
pub use stat_block::StatBlock;
pub use state::{
    ActiveBuff, ActiveStatus, BuffEffect, CombatLogEntry, CombatSetup, CombatState, CombatWeapon,
    Combatant, CooldownState, EncounterOutcome, Stability, WeaponAttack, WeaponCharge,
};
pub use status::{StatusDefinition, StatusRegistry, StatusTick, TickMode};
pub use turn_order::TurnOrder;
pub use types::{CombatStat, Element, Side};
