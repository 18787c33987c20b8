#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combo streak tracking and tier-based damage and gold bonuses.

/// Static definition of a single combo tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComboTier {
    /// Minimum streak required to enter the tier.
    pub threshold: u32,
    /// Display name of the tier.
    pub name: &'static str,
    /// Damage bonus granted while in the tier, in percent.
    pub damage_bonus_percent: u32,
    /// Gold bonus granted while in the tier, in percent.
    pub gold_bonus_percent: u32,
}

impl ComboTier {
    const fn new(
        threshold: u32,
        name: &'static str,
        damage_bonus_percent: u32,
        gold_bonus_percent: u32,
    ) -> Self {
        Self {
            threshold,
            name,
            damage_bonus_percent,
            gold_bonus_percent,
        }
    }
}

/// Tiers ordered by ascending threshold.
pub const COMBO_TIERS: [ComboTier; 8] = [
    ComboTier::new(0, "Default", 0, 0),
    ComboTier::new(3, "Warming Up", 5, 5),
    ComboTier::new(5, "On Fire", 10, 10),
    ComboTier::new(10, "Blazing", 20, 15),
    ComboTier::new(20, "Inferno", 35, 25),
    ComboTier::new(50, "Unstoppable", 50, 40),
    ComboTier::new(100, "Legendary", 75, 60),
    ComboTier::new(200, "Godlike", 100, 80),
];

/// Index of the highest tier whose threshold does not exceed `streak`.
#[must_use]
pub fn tier_index(streak: u32) -> usize {
    COMBO_TIERS
        .partition_point(|tier| tier.threshold <= streak)
        .saturating_sub(1)
}

/// Tier reached at `streak`.
#[must_use]
pub fn tier_for(streak: u32) -> &'static ComboTier {
    &COMBO_TIERS[tier_index(streak)]
}

/// Scales `base` damage by the tier bonus for `streak`, rounding to nearest.
#[must_use]
pub fn apply_damage_bonus(base: u32, streak: u32) -> u32 {
    apply_percent_bonus(base, tier_for(streak).damage_bonus_percent)
}

/// Scales `base` gold by the tier bonus for `streak`, rounding to nearest.
#[must_use]
pub fn apply_gold_bonus(base: u32, streak: u32) -> u32 {
    apply_percent_bonus(base, tier_for(streak).gold_bonus_percent)
}

fn apply_percent_bonus(base: u32, percent: u32) -> u32 {
    let scaled = f64::from(base) * (1.0 + f64::from(percent) / 100.0);
    scaled.round().min(f64::from(u32::MAX)) as u32
}

/// Text shown alongside a running combo, such as `On Fire x7`.
///
/// Returns `None` when there is no streak to show.
#[must_use]
pub fn display_text(streak: u32) -> Option<String> {
    if streak == 0 {
        return None;
    }
    Some(format!("{} x{streak}", tier_for(streak).name))
}

/// Announcement emitted when a streak enters a new tier.
#[must_use]
pub fn milestone_text(streak: u32) -> Option<String> {
    if streak == 0 {
        return None;
    }
    Some(format!("{}! x{streak}", tier_for(streak).name))
}

/// Owns the current and best streak of a wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComboTracker {
    current: u32,
    max: u32,
}

impl ComboTracker {
    /// Creates a tracker with no streak.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: 0, max: 0 }
    }

    /// Restores a tracker from persisted counters.
    ///
    /// The best streak never drops below the current one.
    #[must_use]
    pub fn restore(current: u32, max: u32) -> Self {
        Self {
            current,
            max: max.max(current),
        }
    }

    /// Current streak.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Best streak observed since the last reset.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Records a successful hit and returns the milestone announcement when
    /// the streak entered a new tier.
    pub fn record_hit(&mut self) -> Option<String> {
        let before = tier_index(self.current);
        self.current = self.current.saturating_add(1);
        self.max = self.max.max(self.current);
        if tier_index(self.current) != before {
            milestone_text(self.current)
        } else {
            None
        }
    }

    /// Records a miss, returning the streak that was lost.
    pub fn record_miss(&mut self) -> u32 {
        std::mem::take(&mut self.current)
    }

    /// Clears both counters for a fresh wave.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_index_counts_thresholds_at_or_below_streak() {
        for streak in 0..260 {
            let reached = COMBO_TIERS
                .iter()
                .filter(|tier| tier.threshold <= streak)
                .count();
            assert_eq!(tier_index(streak), reached - 1, "streak {streak}");
        }
        assert_eq!(tier_index(0), 0);
        assert_eq!(tier_index(3), 1);
        assert_eq!(tier_index(199), 6);
        assert_eq!(tier_index(200), 7);
        assert_eq!(tier_index(u32::MAX), 7);
    }

    #[test]
    fn bonuses_match_tier_percentages() {
        assert_eq!(apply_damage_bonus(100, 10), 120);
        assert_eq!(apply_damage_bonus(100, 200), 200);
        assert_eq!(apply_gold_bonus(100, 200), 180);
        assert_eq!(apply_damage_bonus(100, 0), 100);
        assert_eq!(apply_gold_bonus(3, 5), 3);
    }

    #[test]
    fn miss_resets_streak_but_keeps_best() {
        let mut tracker = ComboTracker::new();
        for _ in 0..7 {
            let _ = tracker.record_hit();
        }
        assert_eq!(tracker.record_miss(), 7);
        assert_eq!(tracker.current(), 0);
        assert_eq!(tracker.max(), 7);
        let _ = tracker.record_hit();
        assert_eq!(tracker.max(), 7);
    }

    #[test]
    fn milestones_announce_only_on_tier_change() {
        let mut tracker = ComboTracker::new();
        let announcements: Vec<(u32, String)> = (0..10)
            .filter_map(|_| tracker.record_hit().map(|text| (tracker.current(), text)))
            .collect();
        assert_eq!(
            announcements,
            vec![
                (3, "Warming Up! x3".to_owned()),
                (5, "On Fire! x5".to_owned()),
                (10, "Blazing! x10".to_owned()),
            ]
        );
    }

    #[test]
    fn zero_streak_has_no_text() {
        assert_eq!(display_text(0), None);
        assert_eq!(milestone_text(0), None);
        assert_eq!(display_text(1).as_deref(), Some("Default x1"));
        assert_eq!(display_text(12).as_deref(), Some("Blazing x12"));
    }

    #[test]
    fn restore_keeps_best_at_least_current() {
        let tracker = ComboTracker::restore(9, 4);
        assert_eq!(tracker.current(), 9);
        assert_eq!(tracker.max(), 9);
    }
}
