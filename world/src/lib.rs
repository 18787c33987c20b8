#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the typing defense engine.
//!
//! The [`World`] aggregate owns every piece of mutable simulation state: the
//! running wave and its enemies, the combo counters, the player's keep, and
//! the day and endless progression. Adapters mutate it exclusively through
//! [`apply`] and [`combat_tick`], which append tagged [`Event`] values to a
//! caller-provided log, and inspect it through the [`query`] functions.

mod record;
mod wave;

use std::{collections::BTreeMap, time::Duration};

use tracing::{debug, info, warn};
use typing_defense_core::{
    ChallengeRejection, Command, DifficultyMode, EffectId, EffectTarget, EnemyId, EnemyKind,
    Event, GamePhase, NodeId, ResourceBundle, WaveConfig, WaveRejection, WaveReward, WaveState,
    WordSource, WELCOME_BANNER,
};
use typing_defense_system_combo::{self as combo, ComboTracker};
use typing_defense_system_difficulty as difficulty;
use typing_defense_system_endless as endless;
use typing_defense_system_status_effects::StatusEffects;
use typing_defense_system_typing as typing;

pub use record::{
    EffectRecord, EnemyRecord, NodeCooldownRecord, RecordError, StateRecord, WaveRecord,
    RECORD_HEADER, RECORD_VERSION,
};

use wave::{Enemy, Wave};

/// Maximum health of the keep in a fresh run.
pub const DEFAULT_PLAYER_HEALTH: u32 = 10;

const FIRST_DAY: u32 = 1;

/// Represents the authoritative typing defense world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    phase: GamePhase,
    difficulty: DifficultyMode,
    endless_enabled: bool,
    endless_unlocked: bool,
    endless_day: u32,
    claimed_milestones: Vec<u32>,
    day: u32,
    waves_survived: u32,
    wave_index: u32,
    player_health: u32,
    player_max_health: u32,
    player_effects: StatusEffects,
    gold: u32,
    resources: ResourceBundle,
    combo: ComboTracker,
    wave: Wave,
    cooldown: Duration,
    node_cooldowns: BTreeMap<NodeId, Duration>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new world at the start of day one.
    #[must_use]
    pub fn new() -> Self {
        Self::with_player_health(DEFAULT_PLAYER_HEALTH)
    }

    /// Creates a new world whose keep starts with `max_health` health.
    #[must_use]
    pub fn with_player_health(max_health: u32) -> Self {
        let max_health = max_health.max(1);
        Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::Day,
            difficulty: DifficultyMode::default(),
            endless_enabled: false,
            endless_unlocked: false,
            endless_day: 0,
            claimed_milestones: Vec::new(),
            day: FIRST_DAY,
            waves_survived: 0,
            wave_index: 0,
            player_health: max_health,
            player_max_health: max_health,
            player_effects: StatusEffects::new(),
            gold: 0,
            resources: ResourceBundle::default(),
            combo: ComboTracker::new(),
            wave: Wave::default(),
            cooldown: Duration::ZERO,
            node_cooldowns: BTreeMap::new(),
        }
    }

    fn endless_active(&self) -> bool {
        self.endless_enabled && self.endless_unlocked
    }

    fn planned_wave_size(&self, config: &WaveConfig) -> u32 {
        if config.enemy_count == 0 || difficulty::enemies_disabled(self.difficulty) {
            return 0;
        }
        let size = difficulty::apply_wave_size_modifier(config.enemy_count, self.difficulty);
        if self.endless_active() {
            endless::calculate_wave_size(self.endless_day, size)
        } else {
            size
        }
    }

    fn scaled_enemy_hp(&self, kind: EnemyKind) -> u32 {
        let hp = difficulty::apply_health_modifier(kind.base_hp(), self.difficulty);
        if self.endless_active() {
            endless::calculate_enemy_hp(self.endless_day, hp)
        } else {
            hp
        }
    }

    fn contact_damage(&self, kind: EnemyKind) -> u32 {
        let base = self
            .wave
            .config
            .contact_damage
            .saturating_mul(kind.contact_factor());
        let damage = difficulty::apply_damage_modifier(base, self.difficulty);
        if self.endless_active() {
            endless::calculate_damage(self.endless_day, damage)
        } else {
            damage
        }
    }

    fn speed_scale(&self) -> f64 {
        let scale = difficulty::speed_multiplier(self.difficulty);
        if self.endless_active() {
            scale * endless::speed_scale(self.endless_day)
        } else {
            scale
        }
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            self.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
    }

    fn refresh_endless(&mut self, out_events: &mut Vec<Event>) {
        if self.endless_unlocked || !endless::is_unlocked(self.day, self.waves_survived) {
            return;
        }
        self.endless_unlocked = true;
        info!(day = self.day, waves = self.waves_survived, "endless mode unlocked");
        out_events.push(Event::EndlessUnlocked { day: self.day });
    }

    fn start_wave(&mut self, config: WaveConfig, words: Vec<String>, out_events: &mut Vec<Event>) {
        let rejection = if self.phase == GamePhase::GameOver {
            Some(WaveRejection::GameOver)
        } else if self.wave.state.is_running() {
            Some(WaveRejection::WaveInProgress)
        } else if !self.cooldown.is_zero() {
            Some(WaveRejection::CooldownActive)
        } else {
            None
        };
        if let Some(reason) = rejection {
            out_events.push(Event::WaveStartRejected { reason });
            return;
        }

        let total = self.planned_wave_size(&config);
        self.wave_index = self.wave_index.saturating_add(1);
        self.combo.reset();
        self.wave = Wave::begin(config, total, words);
        debug!(
            wave = self.wave_index,
            enemies = total,
            difficulty = %self.difficulty,
            endless = self.endless_active(),
            "wave started"
        );
        out_events.push(Event::WaveStarted {
            wave: self.wave_index,
            enemies: total,
        });
        self.set_phase(GamePhase::Night, out_events);
    }

    fn count_down_timers(&mut self, dt: Duration) {
        self.cooldown = self.cooldown.saturating_sub(dt);
        for remaining in self.node_cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(dt);
        }
        self.node_cooldowns.retain(|_, remaining| !remaining.is_zero());
    }

    fn tick_player_effects(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let report = self.player_effects.tick(dt);
        if report.damage > 0 {
            self.player_health = self.player_health.saturating_sub(report.damage);
            out_events.push(Event::StatusDamage {
                target: EffectTarget::Player,
                damage: report.damage,
            });
        }
        for effect in report.expired {
            out_events.push(Event::StatusExpired {
                target: EffectTarget::Player,
                effect,
            });
        }
        if self.player_health == 0 {
            self.game_over(out_events);
        }
    }

    fn game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.wave.state.is_running() {
            self.wave.state = WaveState::Breached;
        }
        self.phase = GamePhase::GameOver;
        self.player_effects.clear();
        info!(
            day = self.day,
            waves = self.waves_survived,
            best_combo = self.combo.max(),
            "the keep has fallen"
        );
        out_events.push(Event::GameOver);
    }

    fn spawn_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.wave.spawn_due(dt) {
            return;
        }
        let index = self.wave.total.saturating_sub(self.wave.spawn_remaining);
        let kind = EnemyKind::for_spawn(self.day, index);
        let hp = self.scaled_enemy_hp(kind);
        let word = self.wave.next_word(kind);
        let enemy = self.wave.push_enemy(kind, word, hp);
        out_events.push(Event::EnemySpawned {
            enemy: enemy.id,
            kind,
            word: enemy.word.clone(),
        });
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let step_interval = self.wave.config.step_interval;
        let step_distance = self.wave.config.step_distance.max(1);
        let speed_scale = self.speed_scale();

        let mut breached = Vec::new();
        for enemy in &mut self.wave.enemies {
            let modifiers = enemy.effects.modifiers();
            if modifiers.immobilized {
                continue;
            }
            let speed = speed_scale
                * f64::from(enemy.kind.speed_factor())
                * f64::from(modifiers.speed_multiplier);
            if speed <= 0.0 || !speed.is_finite() {
                continue;
            }

            let elapsed =
                Duration::try_from_secs_f64(dt.as_secs_f64() * speed).unwrap_or(Duration::MAX);
            enemy.step_progress = enemy.step_progress.saturating_add(elapsed);
            if step_interval.is_zero() {
                enemy.distance = 0;
            }
            while enemy.distance > 0 && enemy.step_progress >= step_interval {
                enemy.step_progress -= step_interval;
                enemy.distance = enemy.distance.saturating_sub(step_distance);
            }
            if enemy.distance == 0 {
                breached.push(enemy.id);
            }
        }

        for id in breached {
            let Some(enemy) = self.wave.remove(id) else {
                continue;
            };
            let damage = self.contact_damage(enemy.kind);
            self.player_health = self.player_health.saturating_sub(damage);
            debug!(enemy = %id, damage, health = self.player_health, "enemy breached the keep");
            out_events.push(Event::EnemyBreached { enemy: id, damage });
            if self.player_health == 0 {
                self.game_over(out_events);
                return;
            }
        }
    }

    fn tick_enemy_effects(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut defeated = Vec::new();
        for enemy in &mut self.wave.enemies {
            let report = enemy.effects.tick(dt);
            let target = EffectTarget::Enemy(enemy.id);
            if report.damage > 0 {
                enemy.hp = enemy.hp.saturating_sub(report.damage);
                out_events.push(Event::StatusDamage {
                    target,
                    damage: report.damage,
                });
            }
            for effect in report.expired {
                out_events.push(Event::StatusExpired { target, effect });
            }
            if enemy.hp == 0 {
                defeated.push(enemy.id);
            }
        }

        for id in defeated {
            self.defeat(id, out_events);
        }
    }

    fn resolve_input(&mut self, raw: &str, out_events: &mut Vec<Event>) {
        let report = typing::resolve(
            raw,
            self.wave
                .enemies
                .iter()
                .map(|enemy| (enemy.id, enemy.word.as_str())),
        );

        for entry in report.matches() {
            if let Some(enemy) = self.wave.enemy_mut(entry.enemy) {
                enemy.typed = entry.typed.min(enemy.word_len());
                enemy.is_target = entry.is_target;
            }
            if entry.is_target {
                out_events.push(Event::TypingHit {
                    enemy: entry.enemy,
                    typed: entry.typed,
                });
            }
        }

        if report.is_miss() {
            out_events.push(Event::TypingMiss);
            let streak = self.combo.record_miss();
            if streak > 0 {
                out_events.push(Event::ComboBroken { streak });
            }
            return;
        }

        for entry in report.completed() {
            self.complete_word(entry.enemy, out_events);
        }
    }

    fn complete_word(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let milestone = self.combo.record_hit();
        let streak = self.combo.current();
        let word_damage = self.wave.config.word_damage;
        let Some(enemy) = self.wave.enemy_mut(id) else {
            return;
        };

        let damage = word_hit_damage(word_damage, streak, enemy);
        enemy.hp = enemy.hp.saturating_sub(damage);
        enemy.clear_typing();
        out_events.push(Event::WordCompleted { enemy: id, damage });
        if let Some(text) = milestone {
            out_events.push(Event::ComboMilestone { text });
        }
        self.defeat(id, out_events);
    }

    fn defeat(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.wave.remove(id) else {
            return;
        };
        self.wave.defeated = self.wave.defeated.saturating_add(1);
        let bounty = combo::apply_gold_bonus(enemy.kind.bounty(), self.combo.current());
        let gold = difficulty::apply_gold_modifier(bounty, self.difficulty);
        self.gold = self.gold.saturating_add(gold);
        out_events.push(Event::EnemyDefeated { enemy: id, gold });
    }

    fn finish_wave_if_exhausted(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave.state.is_running() || !self.wave.is_exhausted() || self.player_health == 0
        {
            return;
        }

        let config = &self.wave.config;
        let defeated = self.wave.defeated;
        let base = config
            .base_gold
            .saturating_add(config.per_enemy_gold.saturating_mul(defeated));
        let reward = WaveReward {
            gold: difficulty::apply_gold_modifier(base, self.difficulty),
            resources: config.per_enemy_resources.scaled(defeated),
        };
        self.cooldown = config.cooldown;
        self.wave.state = WaveState::Cleared;
        self.gold = self.gold.saturating_add(reward.gold);
        self.resources = self.resources.saturating_add(reward.resources);
        self.waves_survived = self.waves_survived.saturating_add(1);
        self.day = self.day.saturating_add(1);
        debug!(
            wave = self.wave_index,
            defeated,
            gold = reward.gold,
            best_combo = self.combo.max(),
            "wave repelled"
        );
        out_events.push(Event::WaveRepelled {
            wave: self.wave_index,
            reward,
        });

        if self.endless_active() {
            self.endless_day = self.endless_day.saturating_add(1);
            self.claim_milestone(out_events);
        }
        self.refresh_endless(out_events);
        self.set_phase(GamePhase::Day, out_events);
    }

    fn claim_milestone(&mut self, out_events: &mut Vec<Event>) {
        let Some(milestone) = endless::milestone_for_day(self.endless_day) else {
            return;
        };
        if self.claimed_milestones.contains(&milestone.day) {
            return;
        }
        self.claimed_milestones.push(milestone.day);
        self.gold = self.gold.saturating_add(milestone.gold);
        info!(
            day = milestone.day,
            gold = milestone.gold,
            "{}",
            milestone.description
        );
        out_events.push(Event::EndlessMilestone {
            day: milestone.day,
            name: milestone.name.to_owned(),
            gold: milestone.gold,
        });
    }

    fn apply_status_effect(
        &mut self,
        target: EffectTarget,
        effect: EffectId,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let stacks = match target {
            EffectTarget::Player => self.player_effects.apply(effect),
            EffectTarget::Enemy(id) => match self.wave.enemy_mut(id) {
                Some(enemy) => enemy.effects.apply(effect),
                None => {
                    warn!(enemy = %id, %effect, "status effect target is not alive");
                    return;
                }
            },
        };
        out_events.push(Event::StatusApplied {
            target,
            effect,
            stacks,
        });
    }

    fn submit_challenge(&mut self, challenge: Challenge, out_events: &mut Vec<Event>) {
        let node = challenge.node;
        if self.phase != GamePhase::Day {
            out_events.push(Event::ChallengeRejected {
                node,
                reason: ChallengeRejection::NotDaytime,
            });
            return;
        }
        if self.node_cooldowns.contains_key(&node) {
            out_events.push(Event::ChallengeRejected {
                node,
                reason: ChallengeRejection::NodeCoolingDown,
            });
            return;
        }

        let credit = typing::partial_credit(&challenge.submitted, &challenge.target);
        let resources = scale_bundle(challenge.reward, credit);
        self.resources = self.resources.saturating_add(resources);
        if !challenge.cooldown.is_zero() {
            let _ = self.node_cooldowns.insert(node, challenge.cooldown);
        }
        out_events.push(Event::ResourceGathered {
            node,
            credit_percent: (credit * 100.0).round().clamp(0.0, 100.0) as u32,
            resources,
        });
    }
}

struct Challenge {
    node: NodeId,
    target: String,
    submitted: String,
    reward: ResourceBundle,
    cooldown: Duration,
}

fn word_hit_damage(base: u32, streak: u32, enemy: &Enemy) -> u32 {
    let modifiers = enemy.effects.modifiers();
    let boosted = f64::from(combo::apply_damage_bonus(base, streak))
        * f64::from(modifiers.damage_taken_multiplier);
    let armor = enemy.kind.armor().saturating_add(modifiers.armor).max(0);
    let damage = (boosted.round() as i64 - i64::from(armor)).max(1);
    u32::try_from(damage).unwrap_or(u32::MAX)
}

fn scale_bundle(bundle: ResourceBundle, credit: f64) -> ResourceBundle {
    let scale = |amount: u32| (f64::from(amount) * credit).round().max(0.0) as u32;
    ResourceBundle::new(scale(bundle.wood), scale(bundle.stone), scale(bundle.food))
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartWave { config, words } => world.start_wave(config, words, out_events),
        Command::Tick { dt, input } => combat_tick(world, dt, input.as_deref(), out_events),
        Command::SetDifficulty { mode } => world.difficulty = mode,
        Command::SetEndlessEnabled { enabled } => {
            world.endless_enabled = enabled;
            world.refresh_endless(out_events);
        }
        Command::ApplyStatusEffect { target, effect } => {
            world.apply_status_effect(target, effect, out_events);
        }
        Command::SubmitChallenge {
            node,
            target,
            submitted,
            reward,
            cooldown,
        } => world.submit_challenge(
            Challenge {
                node,
                target,
                submitted,
                reward,
                cooldown,
            },
            out_events,
        ),
    }
}

/// Starts a wave, drawing as many words from `words` as the scaled wave needs.
pub fn start_wave<S>(
    world: &mut World,
    config: WaveConfig,
    words: &mut S,
    out_events: &mut Vec<Event>,
) where
    S: WordSource + ?Sized,
{
    let count = world.planned_wave_size(&config);
    let words = if count == 0 {
        Vec::new()
    } else {
        words.words(count as usize)
    };
    apply(world, Command::StartWave { config, words }, out_events);
}

/// Advances the simulation by one step.
///
/// In order: countdown timers and player effects decay, the wave spawns and
/// advances its enemies, enemy status effects tick, then new `input` is
/// resolved against the live enemies and the wave is finalized if nothing is
/// left. Input is ignored while no wave is running, and nothing happens once
/// the game is over.
pub fn combat_tick(
    world: &mut World,
    dt: Duration,
    input: Option<&str>,
    out_events: &mut Vec<Event>,
) {
    if world.phase == GamePhase::GameOver {
        return;
    }

    world.count_down_timers(dt);
    world.tick_player_effects(dt, out_events);
    if world.phase == GamePhase::GameOver || !world.wave.state.is_running() {
        return;
    }

    world.spawn_enemies(dt, out_events);
    world.advance_enemies(dt, out_events);
    if world.phase == GamePhase::GameOver {
        return;
    }
    world.tick_enemy_effects(dt, out_events);
    if let Some(raw) = input {
        world.resolve_input(raw, out_events);
    }
    world.finish_wave_if_exhausted(out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Enemy, World};
    use typing_defense_core::{
        DifficultyMode, EffectId, EnemyView, GamePhase, ResourceBundle, WaveConfig, WaveState,
    };
    use typing_defense_system_combo as combo;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Outer game phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Lifecycle state of the current wave.
    #[must_use]
    pub fn wave_state(world: &World) -> WaveState {
        world.wave.state
    }

    /// One-based index of the most recently started wave.
    #[must_use]
    pub fn wave_index(world: &World) -> u32 {
        world.wave_index
    }

    /// Enemies still waiting to spawn in the current wave.
    #[must_use]
    pub fn spawn_remaining(world: &World) -> u32 {
        world.wave.spawn_remaining
    }

    /// Enemies defeated during the current wave.
    #[must_use]
    pub fn enemies_defeated(world: &World) -> u32 {
        world.wave.defeated
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.wave.enemies.iter().map(Enemy::snapshot).collect())
    }

    /// Number of enemies a wave started now with `config` would spawn.
    #[must_use]
    pub fn planned_wave_size(world: &World, config: &WaveConfig) -> u32 {
        world.planned_wave_size(config)
    }

    /// Current health of the keep.
    #[must_use]
    pub fn player_health(world: &World) -> u32 {
        world.player_health
    }

    /// Maximum health of the keep.
    #[must_use]
    pub fn player_max_health(world: &World) -> u32 {
        world.player_max_health
    }

    /// Active status effects on the player and their stack counts.
    #[must_use]
    pub fn player_effects(world: &World) -> Vec<(EffectId, u32)> {
        world
            .player_effects
            .iter()
            .map(|instance| (instance.effect(), instance.stacks()))
            .collect()
    }

    /// Gold held by the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Non-gold resources held by the player.
    #[must_use]
    pub fn resources(world: &World) -> ResourceBundle {
        world.resources
    }

    /// Current combo streak.
    #[must_use]
    pub fn combo_streak(world: &World) -> u32 {
        world.combo.current()
    }

    /// Best combo streak of the current wave.
    #[must_use]
    pub fn max_combo_streak(world: &World) -> u32 {
        world.combo.max()
    }

    /// Text describing the running combo, if any.
    #[must_use]
    pub fn combo_text(world: &World) -> Option<String> {
        combo::display_text(world.combo.current())
    }

    /// Current day counter.
    #[must_use]
    pub fn day(world: &World) -> u32 {
        world.day
    }

    /// Number of waves cleared during the run.
    #[must_use]
    pub fn waves_survived(world: &World) -> u32 {
        world.waves_survived
    }

    /// Active difficulty mode.
    #[must_use]
    pub fn difficulty(world: &World) -> DifficultyMode {
        world.difficulty
    }

    /// Whether endless scaling currently applies.
    #[must_use]
    pub fn endless_active(world: &World) -> bool {
        world.endless_active()
    }

    /// Number of waves cleared while endless scaling applied.
    #[must_use]
    pub fn endless_day(world: &World) -> u32 {
        world.endless_day
    }

    /// Time left before another wave may start.
    #[must_use]
    pub fn wave_cooldown(world: &World) -> Duration {
        world.cooldown
    }
}
