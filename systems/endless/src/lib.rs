#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Endless mode unlock rules, day-indexed scaling curves and milestones.

/// Day counter value at which endless mode unlocks.
pub const UNLOCK_DAY: u32 = 15;
/// Cumulative cleared waves at which endless mode unlocks.
pub const UNLOCK_WAVES: u32 = 45;

const HP_SLOPE: f64 = 0.08;
const SPEED_SLOPE: f64 = 0.02;
const COUNT_SLOPE: f64 = 0.05;
const DAMAGE_SLOPE: f64 = 0.04;

/// One-time reward for surviving a number of endless days.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    /// Endless day that grants the milestone.
    pub day: u32,
    /// Milestone name.
    pub name: &'static str,
    /// Gold granted.
    pub gold: u32,
    /// Human-readable description.
    pub description: String,
}

const MILESTONES: [(u32, &str, u32); 5] = [
    (5, "Enduring", 500),
    (10, "Steadfast", 1_000),
    (15, "Unstoppable", 2_000),
    (20, "Relentless", 5_000),
    (30, "Eternal", 10_000),
];

/// Reports whether endless mode is available.
#[must_use]
pub fn is_unlocked(day: u32, waves_survived: u32) -> bool {
    day >= UNLOCK_DAY || waves_survived >= UNLOCK_WAVES
}

/// Enemy hit point multiplier on endless day `day`.
#[must_use]
pub fn hp_scale(day: u32) -> f64 {
    linear(day, HP_SLOPE)
}

/// Enemy speed multiplier on endless day `day`.
#[must_use]
pub fn speed_scale(day: u32) -> f64 {
    linear(day, SPEED_SLOPE)
}

/// Wave size multiplier on endless day `day`.
#[must_use]
pub fn count_scale(day: u32) -> f64 {
    linear(day, COUNT_SLOPE)
}

/// Contact damage multiplier on endless day `day`.
#[must_use]
pub fn damage_scale(day: u32) -> f64 {
    linear(day, DAMAGE_SLOPE)
}

fn linear(day: u32, slope: f64) -> f64 {
    1.0 + slope * f64::from(day)
}

fn round_scaled(base: u32, scale: f64) -> u32 {
    (f64::from(base) * scale).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Number of enemies in a wave of `base_size` on endless day `day`.
#[must_use]
pub fn calculate_wave_size(day: u32, base_size: u32) -> u32 {
    round_scaled(base_size, count_scale(day))
}

/// Enemy hit points for `base_hp` on endless day `day`.
#[must_use]
pub fn calculate_enemy_hp(day: u32, base_hp: u32) -> u32 {
    round_scaled(base_hp, hp_scale(day))
}

/// Contact damage for `base_damage` on endless day `day`.
#[must_use]
pub fn calculate_damage(day: u32, base_damage: u32) -> u32 {
    round_scaled(base_damage, damage_scale(day))
}

/// Milestone granted on endless day `day`, if any.
#[must_use]
pub fn milestone_for_day(day: u32) -> Option<Milestone> {
    MILESTONES
        .iter()
        .find(|(milestone_day, _, _)| *milestone_day == day)
        .map(|&(day, name, gold)| Milestone {
            day,
            name,
            gold,
            description: format!("Survived {day} endless days"),
        })
}

/// Every milestone day in ascending order.
pub fn milestone_days() -> impl Iterator<Item = u32> {
    MILESTONES.iter().map(|(day, _, _)| *day)
}
