//! Combat formulas - Derived combat numbers from raw attributes
//!
//! Every function here is pure. Percentages (accuracy, evasion, crit chance)
//! are expressed on a 0-100 scale.
//!
//! Formulas:
//! - max_hp = base_hp + vitality * 10
//! - attack = floor(strength * 2.0)
//! - defense = floor(vitality * 1.5)
//! - speed = base_speed + agility * 1.2
//! - accuracy = 95 + focus * 0.20
//! - evasion = 5 + agility * 0.15
//! - crit_chance = 5 + focus * 0.15 + luck * 0.10
//! - resistance = max(0, floor(focus * 0.10))
//! - skill_potency = 1 + focus * 0.01

/// Damage multiplier applied on a critical hit
pub const CRIT_DAMAGE_MULTIPLIER: f64 = 2.0;

/// Stability multipliers per enemy tier
pub const BOSS_STABILITY_MULTIPLIER: f64 = 0.95;
pub const ELITE_STABILITY_MULTIPLIER: f64 = 0.85;
pub const MINI_STABILITY_MULTIPLIER: f64 = 0.75;
pub const DEFAULT_STABILITY_MULTIPLIER: f64 = 0.6;

pub fn max_hp(base_hp: u32, vitality: u32) -> u32 {
    base_hp.saturating_add(vitality.saturating_mul(10))
}

pub fn attack_power(strength: u32) -> u32 {
    (strength as f64 * 2.0).floor() as u32
}

pub fn defense_power(vitality: u32) -> u32 {
    (vitality as f64 * 1.5).floor() as u32
}

pub fn speed(base_speed: u32, agility: u32) -> f64 {
    base_speed as f64 + agility as f64 * 1.2
}

pub fn accuracy(focus: u32) -> f64 {
    95.0 + focus as f64 * 0.20
}

pub fn evasion(agility: u32) -> f64 {
    5.0 + agility as f64 * 0.15
}

/// Critical strike chance in percent
pub fn crit_chance(focus: u32, luck: u32) -> f64 {
    5.0 + focus as f64 * 0.15 + luck as f64 * 0.10
}

/// Flat reduction applied to incoming hit chance
pub fn general_resistance(focus: u32) -> u32 {
    (focus as f64 * 0.10).floor().max(0.0) as u32
}

pub fn skill_potency_multiplier(focus: u32) -> f64 {
    1.0 + focus as f64 * 0.01
}

/// Chance for a single-target hit to land, clamped to 0-100
pub fn hit_chance(accuracy: f64, evasion: f64, resistance: f64) -> f64 {
    (accuracy - evasion - resistance).clamp(0.0, 100.0)
}

/// Stability meter size for an enemy tier
///
/// The tier string is trimmed and compared case-insensitively; unknown or
/// empty tiers use the default multiplier. The result is never below 1.
pub fn stability_for_tier(max_hp: u32, tier: &str) -> u32 {
    let multiplier = match tier.trim().to_ascii_lowercase().as_str() {
        "boss" => BOSS_STABILITY_MULTIPLIER,
        "elite" => ELITE_STABILITY_MULTIPLIER,
        "mini" => MINI_STABILITY_MULTIPLIER,
        _ => DEFAULT_STABILITY_MULTIPLIER,
    };
    ((max_hp as f64 * multiplier).round() as u32).max(1)
}
