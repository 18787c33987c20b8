#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Status effect registry and the per-entity effect stack.
//!
//! Definitions are immutable and indexed by [`EffectId`]; each enemy (and the
//! player) owns a [`StatusEffects`] stack that applies, decays and aggregates
//! them. Stacking refreshes the remaining duration rather than extending it.

use std::time::Duration;

use typing_defense_core::EffectId;

/// Immutable definition of a registered status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectDefinition {
    /// Identifier of the effect.
    pub id: EffectId,
    /// Full duration applied on every application.
    pub duration: Duration,
    /// Additive speed change per stack; negative values slow the holder.
    pub speed_modifier: f32,
    /// Additive armor change per stack; negative values increase damage taken.
    pub armor_modifier: i32,
    /// Additive damage-taken fraction per stack.
    pub damage_taken_modifier: f32,
    /// Damage dealt per stack on every tick.
    pub dot_damage: u32,
    /// Maximum number of stacks.
    pub max_stacks: u32,
    /// Whether the holder is unable to move.
    pub immobilized: bool,
}

impl EffectDefinition {
    const fn new(id: EffectId, duration_ms: u64, max_stacks: u32) -> Self {
        Self {
            id,
            duration: Duration::from_millis(duration_ms),
            speed_modifier: 0.0,
            armor_modifier: 0,
            damage_taken_modifier: 0.0,
            dot_damage: 0,
            max_stacks,
            immobilized: false,
        }
    }

    const fn speed(mut self, modifier: f32) -> Self {
        self.speed_modifier = modifier;
        self
    }

    const fn armor(mut self, modifier: i32) -> Self {
        self.armor_modifier = modifier;
        self
    }

    const fn damage_taken(mut self, modifier: f32) -> Self {
        self.damage_taken_modifier = modifier;
        self
    }

    const fn dot(mut self, damage: u32) -> Self {
        self.dot_damage = damage;
        self
    }

    const fn immobilize(mut self) -> Self {
        self.immobilized = true;
        self
    }
}

/// Registered effects, indexed by the discriminant of [`EffectId`].
pub const EFFECT_TABLE: [EffectDefinition; 9] = [
    EffectDefinition::new(EffectId::Slow, 3_000, 3).speed(-0.3),
    EffectDefinition::new(EffectId::Frozen, 2_000, 1)
        .damage_taken(0.25)
        .immobilize(),
    EffectDefinition::new(EffectId::Rooted, 2_500, 1).immobilize(),
    EffectDefinition::new(EffectId::Burning, 4_000, 5).dot(2),
    EffectDefinition::new(EffectId::Poisoned, 6_000, 10).dot(1),
    EffectDefinition::new(EffectId::Bleeding, 5_000, 5)
        .dot(1)
        .speed(-0.1),
    EffectDefinition::new(EffectId::Corrupting, 8_000, 3)
        .dot(1)
        .damage_taken(0.1),
    EffectDefinition::new(EffectId::ArmorBroken, 5_000, 3).armor(-1),
    EffectDefinition::new(EffectId::Exposed, 4_000, 1).damage_taken(0.5),
];

/// Looks up the definition of an effect.
#[must_use]
pub fn definition(effect: EffectId) -> &'static EffectDefinition {
    &EFFECT_TABLE[effect as usize]
}

/// Active instance of an effect on a single holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusInstance {
    effect: EffectId,
    stacks: u32,
    remaining: Duration,
}

impl StatusInstance {
    /// Effect this instance tracks.
    #[must_use]
    pub const fn effect(&self) -> EffectId {
        self.effect
    }

    /// Current stack count.
    #[must_use]
    pub const fn stacks(&self) -> u32 {
        self.stacks
    }

    /// Time left before the instance expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Aggregated modifiers of every active instance on a holder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectModifiers {
    /// Multiplier applied to movement speed, never negative.
    pub speed_multiplier: f32,
    /// Armor change to add to the holder's base armor.
    pub armor: i32,
    /// Multiplier applied to incoming damage, never negative.
    pub damage_taken_multiplier: f32,
    /// Whether any active instance immobilizes the holder.
    pub immobilized: bool,
}

impl Default for EffectModifiers {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            armor: 0,
            damage_taken_multiplier: 1.0,
            immobilized: false,
        }
    }
}

/// Result of advancing a holder's effects by one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectTick {
    /// Damage over time dealt this tick.
    pub damage: u32,
    /// Effects that ran out this tick, in identifier order.
    pub expired: Vec<EffectId>,
}

/// Stack of status effects owned by a single holder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    instances: Vec<StatusInstance>,
}

impl StatusEffects {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Applies `effect`, stacking up to its limit and refreshing its duration.
    ///
    /// Returns the stack count after application.
    pub fn apply(&mut self, effect: EffectId) -> u32 {
        let definition = definition(effect);
        match self.position(effect) {
            Ok(index) => {
                let instance = &mut self.instances[index];
                instance.stacks = instance
                    .stacks
                    .saturating_add(1)
                    .min(definition.max_stacks);
                instance.remaining = definition.duration;
                instance.stacks
            }
            Err(index) => {
                self.instances.insert(
                    index,
                    StatusInstance {
                        effect,
                        stacks: 1,
                        remaining: definition.duration,
                    },
                );
                1
            }
        }
    }

    /// Reinstates a persisted instance, clamping it into the definition's limits.
    ///
    /// Instances with no time left are dropped.
    pub fn restore(&mut self, effect: EffectId, stacks: u32, remaining: Duration) {
        if remaining.is_zero() {
            return;
        }
        let definition = definition(effect);
        let instance = StatusInstance {
            effect,
            stacks: stacks.clamp(1, definition.max_stacks),
            remaining: remaining.min(definition.duration),
        };
        match self.position(effect) {
            Ok(index) => self.instances[index] = instance,
            Err(index) => self.instances.insert(index, instance),
        }
    }

    /// Deals damage over time, then decays every instance by `dt`.
    pub fn tick(&mut self, dt: Duration) -> EffectTick {
        let mut report = EffectTick::default();
        if dt.is_zero() {
            return report;
        }

        for instance in &self.instances {
            let per_stack = definition(instance.effect).dot_damage;
            report.damage = report
                .damage
                .saturating_add(per_stack.saturating_mul(instance.stacks));
        }

        for instance in &mut self.instances {
            instance.remaining = instance.remaining.saturating_sub(dt);
        }

        self.instances.retain(|instance| {
            if instance.remaining.is_zero() {
                report.expired.push(instance.effect);
                false
            } else {
                true
            }
        });
        report
    }

    /// Combines the modifiers of every active instance.
    ///
    /// Speed multiplies per instance, armor and damage taken add up, so the
    /// result does not depend on application order.
    #[must_use]
    pub fn modifiers(&self) -> EffectModifiers {
        let mut modifiers = EffectModifiers::default();
        let mut damage_taken = 0.0_f32;
        for instance in &self.instances {
            let definition = definition(instance.effect);
            let stacks = instance.stacks as f32;
            modifiers.speed_multiplier *= (1.0 + definition.speed_modifier * stacks).max(0.0);
            modifiers.armor = modifiers
                .armor
                .saturating_add(definition.armor_modifier.saturating_mul(instance.stacks as i32));
            damage_taken += definition.damage_taken_modifier * stacks;
            modifiers.immobilized |= definition.immobilized;
        }
        modifiers.damage_taken_multiplier = (1.0 + damage_taken).max(0.0);
        modifiers
    }

    /// Stack count of `effect`, or zero when it is not active.
    #[must_use]
    pub fn stacks(&self, effect: EffectId) -> u32 {
        self.get(effect).map_or(0, StatusInstance::stacks)
    }

    /// Active instance of `effect`, if any.
    #[must_use]
    pub fn get(&self, effect: EffectId) -> Option<&StatusInstance> {
        self.position(effect).ok().map(|index| &self.instances[index])
    }

    /// Iterator over active instances in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.instances.iter()
    }

    /// Reports whether no effects are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Removes every active instance.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    fn position(&self, effect: EffectId) -> Result<usize, usize> {
        self.instances
            .binary_search_by_key(&effect, |instance| instance.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_effect_discriminant() {
        for (index, effect) in EffectId::ALL.into_iter().enumerate() {
            assert_eq!(EFFECT_TABLE[index].id, effect);
            assert!(EFFECT_TABLE[index].max_stacks >= 1);
        }
    }

    #[test]
    fn burning_caps_at_five_and_refreshes_duration() {
        let mut effects = StatusEffects::new();
        let base = definition(EffectId::Burning).duration;
        for application in 1..=6 {
            let _ = effects.tick(Duration::from_millis(700));
            let stacks = effects.apply(EffectId::Burning);
            assert_eq!(stacks, application.min(5));
            assert_eq!(
                effects.get(EffectId::Burning).map(StatusInstance::remaining),
                Some(base)
            );
        }
        assert_eq!(effects.stacks(EffectId::Burning), 5);
    }

    #[test]
    fn instances_expire_once_duration_elapses() {
        let mut effects = StatusEffects::new();
        let _ = effects.apply(EffectId::Exposed);
        let first = effects.tick(Duration::from_secs(3));
        assert!(first.expired.is_empty());
        let second = effects.tick(Duration::from_secs(1));
        assert_eq!(second.expired, vec![EffectId::Exposed]);
        assert!(effects.is_empty());
    }

    #[test]
    fn damage_over_time_scales_with_stacks() {
        let mut effects = StatusEffects::new();
        let _ = effects.apply(EffectId::Burning);
        let _ = effects.apply(EffectId::Burning);
        let _ = effects.apply(EffectId::Poisoned);
        assert_eq!(effects.tick(Duration::from_millis(16)).damage, 2 * 2 + 1);
        assert_eq!(effects.tick(Duration::ZERO).damage, 0);
    }

    #[test]
    fn modifiers_combine_independent_of_order() {
        let mut forward = StatusEffects::new();
        let mut reverse = StatusEffects::new();
        let order = [EffectId::Slow, EffectId::ArmorBroken, EffectId::Exposed];
        for effect in order {
            let _ = forward.apply(effect);
        }
        for effect in order.into_iter().rev() {
            let _ = reverse.apply(effect);
        }
        assert_eq!(forward.modifiers(), reverse.modifiers());

        let modifiers = forward.modifiers();
        assert!((modifiers.speed_multiplier - 0.7).abs() < 1e-6);
        assert_eq!(modifiers.armor, -1);
        assert!((modifiers.damage_taken_multiplier - 1.5).abs() < 1e-6);
        assert!(!modifiers.immobilized);
    }

    #[test]
    fn any_immobilizing_effect_immobilizes() {
        let mut effects = StatusEffects::new();
        let _ = effects.apply(EffectId::Burning);
        assert!(!effects.modifiers().immobilized);
        let _ = effects.apply(EffectId::Rooted);
        assert!(effects.modifiers().immobilized);
    }

    #[test]
    fn restore_clamps_into_definition_limits() {
        let mut effects = StatusEffects::new();
        effects.restore(EffectId::Slow, 12, Duration::from_secs(60));
        effects.restore(EffectId::Burning, 2, Duration::ZERO);
        let slow = effects.get(EffectId::Slow).copied().expect("slow restored");
        assert_eq!(slow.stacks(), 3);
        assert_eq!(slow.remaining(), definition(EffectId::Slow).duration);
        assert_eq!(effects.stacks(EffectId::Burning), 0);
    }
}
