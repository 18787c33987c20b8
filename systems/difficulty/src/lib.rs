#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty mode registry and modifier arithmetic.
//!
//! Modifiers multiply a base value, floor the product and clamp it to a
//! minimum of one, so no mode can reduce a stat to zero.

use typing_defense_core::DifficultyMode;

/// Achievement key that unlocks champion mode.
pub const FULL_ALPHABET_UNLOCK: &str = "full_alphabet";
/// Achievement key that unlocks nightmare mode.
pub const CHAMPION_COMPLETE_UNLOCK: &str = "champion_complete";

// Absorbs representation error so products such as 5 x 1.4 floor to 7.
const FLOOR_EPSILON: f64 = 1e-9;

/// Multiplicative modifiers defined by a difficulty mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyModifiers {
    /// Mode the modifiers belong to.
    pub mode: DifficultyMode,
    /// Name shown to players.
    pub display_name: &'static str,
    /// Multiplier for enemy hit points.
    pub enemy_health: f64,
    /// Multiplier for damage enemies deal to the keep.
    pub enemy_damage: f64,
    /// Multiplier for enemy movement speed.
    pub enemy_speed: f64,
    /// Multiplier for the number of enemies per wave.
    pub wave_size: f64,
    /// Multiplier for gold income.
    pub gold: f64,
    /// Whether waves spawn no enemies at all.
    pub enemies_disabled: bool,
    /// Achievement required before the mode may be selected.
    pub unlock_requirement: Option<&'static str>,
}

/// Registered modes in table order.
pub const DIFFICULTY_TABLE: [DifficultyModifiers; 5] = [
    DifficultyModifiers {
        mode: DifficultyMode::Story,
        display_name: "Story",
        enemy_health: 0.6,
        enemy_damage: 0.5,
        enemy_speed: 0.8,
        wave_size: 0.7,
        gold: 1.2,
        enemies_disabled: false,
        unlock_requirement: None,
    },
    DifficultyModifiers {
        mode: DifficultyMode::Adventure,
        display_name: "Adventure",
        enemy_health: 1.0,
        enemy_damage: 1.0,
        enemy_speed: 1.0,
        wave_size: 1.0,
        gold: 1.0,
        enemies_disabled: false,
        unlock_requirement: None,
    },
    DifficultyModifiers {
        mode: DifficultyMode::Champion,
        display_name: "Champion",
        enemy_health: 1.4,
        enemy_damage: 1.5,
        enemy_speed: 1.2,
        wave_size: 1.3,
        gold: 1.25,
        enemies_disabled: false,
        unlock_requirement: Some(FULL_ALPHABET_UNLOCK),
    },
    DifficultyModifiers {
        mode: DifficultyMode::Nightmare,
        display_name: "Nightmare",
        enemy_health: 2.0,
        enemy_damage: 2.0,
        enemy_speed: 1.4,
        wave_size: 1.6,
        gold: 1.5,
        enemies_disabled: false,
        unlock_requirement: Some(CHAMPION_COMPLETE_UNLOCK),
    },
    DifficultyModifiers {
        mode: DifficultyMode::Zen,
        display_name: "Zen",
        enemy_health: 0.05,
        enemy_damage: 0.0,
        enemy_speed: 0.5,
        wave_size: 0.0,
        gold: 0.25,
        enemies_disabled: true,
        unlock_requirement: None,
    },
];

/// Modifiers of `mode`.
#[must_use]
pub fn modifiers(mode: DifficultyMode) -> &'static DifficultyModifiers {
    DIFFICULTY_TABLE
        .iter()
        .find(|entry| entry.mode == mode)
        .unwrap_or(&DIFFICULTY_TABLE[1])
}

/// Modifiers of the mode named `id`, falling back to adventure.
#[must_use]
pub fn modifiers_by_id(id: &str) -> &'static DifficultyModifiers {
    modifiers(DifficultyMode::resolve(id))
}

fn scale(base: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(base) * multiplier + FLOOR_EPSILON).floor();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else {
        scaled.min(f64::from(u32::MAX)) as u32
    }
}

/// Scales enemy hit points.
#[must_use]
pub fn apply_health_modifier(base: u32, mode: DifficultyMode) -> u32 {
    scale(base, modifiers(mode).enemy_health)
}

/// Scales damage dealt by enemies.
#[must_use]
pub fn apply_damage_modifier(base: u32, mode: DifficultyMode) -> u32 {
    scale(base, modifiers(mode).enemy_damage)
}

/// Scales the number of enemies in a wave.
#[must_use]
pub fn apply_wave_size_modifier(base: u32, mode: DifficultyMode) -> u32 {
    scale(base, modifiers(mode).wave_size)
}

/// Scales gold income.
#[must_use]
pub fn apply_gold_modifier(base: u32, mode: DifficultyMode) -> u32 {
    scale(base, modifiers(mode).gold)
}

/// Speed multiplier for enemies in `mode`.
#[must_use]
pub fn speed_multiplier(mode: DifficultyMode) -> f64 {
    modifiers(mode).enemy_speed
}

/// Reports whether `mode` spawns no enemies.
#[must_use]
pub fn enemies_disabled(mode: DifficultyMode) -> bool {
    modifiers(mode).enemies_disabled
}

/// Reports whether `mode` may be selected given the earned achievement keys.
#[must_use]
pub fn is_unlocked(mode: DifficultyMode, unlocks: &[&str]) -> bool {
    match modifiers(mode).unlock_requirement {
        None => true,
        Some(requirement) => unlocks.contains(&requirement),
    }
}

/// Modes available given the earned achievement keys, in table order.
#[must_use]
pub fn unlocked_modes(unlocks: &[&str]) -> Vec<DifficultyMode> {
    DIFFICULTY_TABLE
        .iter()
        .filter(|entry| is_unlocked(entry.mode, unlocks))
        .map(|entry| entry.mode)
        .collect()
}
