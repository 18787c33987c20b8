#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the typing defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` and `combat_tick` entry points, and then appends [`Event`] values to
//! an ordered log that presentation layers consume. Every event renders to a
//! stable string tag through its [`fmt::Display`] implementation.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "The keep stands. Type to defend it.";

/// Outer game phase that gates which interactions are available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Daytime: waves are not running and resource challenges are allowed.
    #[default]
    Day,
    /// Night: an assault wave is in progress.
    Night,
    /// The keep has fallen and the run is over.
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::GameOver => "game_over",
        };
        f.write_str(label)
    }
}

/// Lifecycle state of the current wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveState {
    /// No wave has been started yet.
    #[default]
    Idle,
    /// Enemies remain in the spawn queue.
    Spawning,
    /// Every enemy has spawned and some are still alive.
    Active,
    /// The wave ended with every enemy defeated or breached and the player alive.
    Cleared,
    /// The player's health reached zero during the wave.
    Breached,
}

impl WaveState {
    /// Reports whether the wave is still being resolved.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Spawning | Self::Active)
    }
}

/// Unique identifier assigned to an enemy within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a resource node used for typing challenges outside waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new resource node identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of enemies that can appear during a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline attacker.
    Raider,
    /// Fast, fragile attacker.
    Scout,
    /// Slow attacker that shrugs off part of every hit.
    Armored,
    /// Heavy attacker that hits the keep twice as hard.
    Brute,
}

impl EnemyKind {
    /// Every enemy kind in spawn-table order.
    pub const ALL: [EnemyKind; 4] = [Self::Raider, Self::Scout, Self::Armored, Self::Brute];

    /// Hit points before difficulty and endless scaling.
    #[must_use]
    pub const fn base_hp(self) -> u32 {
        match self {
            Self::Raider => 3,
            Self::Scout => 2,
            Self::Armored => 5,
            Self::Brute => 8,
        }
    }

    /// Flat damage reduction applied to word hits.
    #[must_use]
    pub const fn armor(self) -> i32 {
        match self {
            Self::Raider | Self::Scout => 0,
            Self::Armored => 1,
            Self::Brute => 2,
        }
    }

    /// Multiplier applied to the rate at which the enemy accumulates step time.
    #[must_use]
    pub const fn speed_factor(self) -> f32 {
        match self {
            Self::Raider => 1.0,
            Self::Scout => 1.5,
            Self::Armored => 0.75,
            Self::Brute => 0.6,
        }
    }

    /// Multiplier applied to the wave's contact damage when the enemy breaches.
    #[must_use]
    pub const fn contact_factor(self) -> u32 {
        match self {
            Self::Brute => 2,
            _ => 1,
        }
    }

    /// Gold bounty awarded when the enemy is defeated.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Raider | Self::Scout => 1,
            Self::Armored => 2,
            Self::Brute => 3,
        }
    }

    /// Selects the kind for the `index`-th spawn of a wave on the given day.
    ///
    /// Early days only field raiders and scouts; armored enemies join from day
    /// three and brutes from day six. Selection rotates through the unlocked
    /// pool so identical inputs always yield identical waves.
    #[must_use]
    pub fn for_spawn(day: u32, index: u32) -> Self {
        let unlocked = match day {
            0..=2 => 2,
            3..=5 => 3,
            _ => Self::ALL.len(),
        };
        let slot = (u64::from(index) + u64::from(day)) % unlocked as u64;
        Self::ALL[slot as usize]
    }
}

/// Identifier of a registered status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectId {
    /// Reduces movement speed.
    Slow,
    /// Halts movement and leaves the target brittle.
    Frozen,
    /// Halts movement.
    Rooted,
    /// Fire damage over time.
    Burning,
    /// Poison damage over time.
    Poisoned,
    /// Light damage over time that stacks deep.
    Bleeding,
    /// Damage over time that also increases damage taken.
    Corrupting,
    /// Strips armor.
    ArmorBroken,
    /// Increases damage taken.
    Exposed,
}

impl EffectId {
    /// Every registered effect in table order.
    pub const ALL: [EffectId; 9] = [
        Self::Slow,
        Self::Frozen,
        Self::Rooted,
        Self::Burning,
        Self::Poisoned,
        Self::Bleeding,
        Self::Corrupting,
        Self::ArmorBroken,
        Self::Exposed,
    ];

    /// Stable string key of the effect.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Frozen => "frozen",
            Self::Rooted => "rooted",
            Self::Burning => "burning",
            Self::Poisoned => "poisoned",
            Self::Bleeding => "bleeding",
            Self::Corrupting => "corrupting",
            Self::ArmorBroken => "armor_broken",
            Self::Exposed => "exposed",
        }
    }

    /// Resolves a string key into an effect identifier.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim();
        Self::ALL
            .into_iter()
            .find(|effect| effect.key().eq_ignore_ascii_case(normalized))
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Named preset of multiplicative modifiers altering challenge level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyMode {
    /// Gentle mode for learning.
    Story,
    /// Baseline mode.
    #[default]
    Adventure,
    /// Harder mode unlocked by the full alphabet achievement.
    Champion,
    /// Hardest mode unlocked by completing champion.
    Nightmare,
    /// Practice mode without enemies.
    Zen,
}

impl DifficultyMode {
    /// Every mode in table order.
    pub const ALL: [DifficultyMode; 5] = [
        Self::Story,
        Self::Adventure,
        Self::Champion,
        Self::Nightmare,
        Self::Zen,
    ];

    /// Stable string identifier of the mode.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Adventure => "adventure",
            Self::Champion => "champion",
            Self::Nightmare => "nightmare",
            Self::Zen => "zen",
        }
    }

    /// Resolves an identifier, falling back to [`DifficultyMode::Adventure`]
    /// for anything unrecognised.
    #[must_use]
    pub fn resolve(id: &str) -> Self {
        let normalized = id.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.id().eq_ignore_ascii_case(normalized))
            .unwrap_or_default()
    }
}

impl fmt::Display for DifficultyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Holder of a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// A live enemy in the current wave.
    Enemy(EnemyId),
    /// The player's keep.
    Player,
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enemy(id) => write!(f, "enemy{id}"),
            Self::Player => f.write_str("player"),
        }
    }
}

/// Non-gold resources granted by waves and challenges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceBundle {
    /// Wood units.
    pub wood: u32,
    /// Stone units.
    pub stone: u32,
    /// Food units.
    pub food: u32,
}

impl ResourceBundle {
    /// Creates a bundle from explicit amounts.
    #[must_use]
    pub const fn new(wood: u32, stone: u32, food: u32) -> Self {
        Self { wood, stone, food }
    }

    /// Multiplies every resource by `factor`, saturating on overflow.
    #[must_use]
    pub const fn scaled(self, factor: u32) -> Self {
        Self {
            wood: self.wood.saturating_mul(factor),
            stone: self.stone.saturating_mul(factor),
            food: self.food.saturating_mul(factor),
        }
    }

    /// Adds another bundle, saturating on overflow.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            wood: self.wood.saturating_add(other.wood),
            stone: self.stone.saturating_add(other.stone),
            food: self.food.saturating_add(other.food),
        }
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wood={},stone={},food={}",
            self.wood, self.stone, self.food
        )
    }
}

/// Rewards granted when a wave is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveReward {
    /// Gold granted.
    pub gold: u32,
    /// Other resources granted.
    pub resources: ResourceBundle,
}

impl fmt::Display for WaveReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gold={},{}", self.gold, self.resources)
    }
}

/// Tunable constants describing a single wave.
///
/// Difficulty and endless scaling are applied on top of these values when the
/// wave starts, so the configuration always expresses adventure-mode intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of enemies to spawn before scaling.
    pub enemy_count: u32,
    /// Time between consecutive spawns.
    pub spawn_interval: Duration,
    /// Step time an enemy must accumulate before it advances.
    pub step_interval: Duration,
    /// Distance covered by a single enemy step.
    pub step_distance: u32,
    /// Distance from the keep at which enemies appear.
    pub spawn_distance: u32,
    /// Damage dealt to the keep when an enemy reaches it.
    pub contact_damage: u32,
    /// Damage dealt to an enemy when its word is completed.
    pub word_damage: u32,
    /// Gold granted for clearing the wave.
    pub base_gold: u32,
    /// Additional gold per enemy defeated during the wave.
    pub per_enemy_gold: u32,
    /// Resources granted per enemy defeated during the wave.
    pub per_enemy_resources: ResourceBundle,
    /// Delay after a cleared wave before another may start.
    pub cooldown: Duration,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enemy_count: 6,
            spawn_interval: Duration::from_millis(2_500),
            step_interval: Duration::from_secs(1),
            step_distance: 1,
            spawn_distance: 12,
            contact_damage: 1,
            word_damage: 3,
            base_gold: 10,
            per_enemy_gold: 3,
            per_enemy_resources: ResourceBundle::new(2, 1, 1),
            cooldown: Duration::from_secs(5),
        }
    }
}

/// Reasons a wave start request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveRejection {
    /// A wave is already spawning or active.
    WaveInProgress,
    /// The post-wave cooldown has not elapsed.
    CooldownActive,
    /// The run has ended.
    GameOver,
}

impl fmt::Display for WaveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WaveInProgress => "wave_in_progress",
            Self::CooldownActive => "cooldown_active",
            Self::GameOver => "game_over",
        };
        f.write_str(label)
    }
}

/// Reasons a resource challenge may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeRejection {
    /// Challenges are only available during the day.
    NotDaytime,
    /// The node was harvested recently.
    NodeCoolingDown,
}

impl fmt::Display for ChallengeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotDaytime => "not_daytime",
            Self::NodeCoolingDown => "cooling_down",
        };
        f.write_str(label)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins a new wave using the provided configuration.
    StartWave {
        /// Wave constants before difficulty and endless scaling.
        config: WaveConfig,
        /// Words supplied by the content collaborator, assigned in order.
        words: Vec<String>,
    },
    /// Advances the simulation by one combat tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Raw typed input captured since the previous tick, if it changed.
        input: Option<String>,
    },
    /// Selects the active difficulty mode.
    SetDifficulty {
        /// Mode to activate.
        mode: DifficultyMode,
    },
    /// Enables or disables endless scaling once it is unlocked.
    SetEndlessEnabled {
        /// Whether endless mode is enabled.
        enabled: bool,
    },
    /// Attaches a status effect to an enemy or the player.
    ApplyStatusEffect {
        /// Holder of the effect.
        target: EffectTarget,
        /// Effect to apply.
        effect: EffectId,
    },
    /// Scores a typed word against a resource node's challenge word.
    SubmitChallenge {
        /// Node being harvested.
        node: NodeId,
        /// Word the node asked for.
        target: String,
        /// Word the player submitted.
        submitted: String,
        /// Resources granted at full credit.
        reward: ResourceBundle,
        /// Time before the node can be harvested again.
        cooldown: Duration,
    },
}

/// Events appended to the tick log after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A new wave began spawning.
    WaveStarted {
        /// One-based index of the wave within the run.
        wave: u32,
        /// Number of enemies queued after scaling.
        enemies: u32,
    },
    /// A wave start request was rejected.
    WaveStartRejected {
        /// Reason for the rejection.
        reason: WaveRejection,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Word the player must type to defeat it.
        word: String,
    },
    /// The typed input advanced on an enemy's word.
    TypingHit {
        /// Enemy whose word matches the input.
        enemy: EnemyId,
        /// Number of characters typed so far.
        typed: u32,
    },
    /// New non-empty input matched no live enemy.
    TypingMiss,
    /// An enemy's word was typed in full.
    WordCompleted {
        /// Enemy whose word was completed.
        enemy: EnemyId,
        /// Damage dealt by the completed word.
        damage: u32,
    },
    /// An enemy was defeated and removed.
    EnemyDefeated {
        /// Enemy that was defeated.
        enemy: EnemyId,
        /// Gold bounty awarded.
        gold: u32,
    },
    /// An enemy reached the keep.
    EnemyBreached {
        /// Enemy that reached the keep.
        enemy: EnemyId,
        /// Damage dealt to the keep.
        damage: u32,
    },
    /// A status effect was applied or stacked.
    StatusApplied {
        /// Holder of the effect.
        target: EffectTarget,
        /// Effect that was applied.
        effect: EffectId,
        /// Stack count after application.
        stacks: u32,
    },
    /// A status effect ran out.
    StatusExpired {
        /// Holder of the effect.
        target: EffectTarget,
        /// Effect that expired.
        effect: EffectId,
    },
    /// Damage over time was dealt.
    StatusDamage {
        /// Holder that took the damage.
        target: EffectTarget,
        /// Damage dealt this tick.
        damage: u32,
    },
    /// The combo crossed into a new tier.
    ComboMilestone {
        /// Announcement text, for example `Blazing! x10`.
        text: String,
    },
    /// A miss ended a running combo.
    ComboBroken {
        /// Streak that was lost.
        streak: u32,
    },
    /// The wave was cleared and rewards granted.
    WaveRepelled {
        /// One-based index of the cleared wave.
        wave: u32,
        /// Rewards granted.
        reward: WaveReward,
    },
    /// Endless scaling became active.
    EndlessUnlocked {
        /// Day on which endless mode became active.
        day: u32,
    },
    /// An endless milestone was reached for the first time.
    EndlessMilestone {
        /// Endless day of the milestone.
        day: u32,
        /// Milestone name.
        name: String,
        /// Gold granted.
        gold: u32,
    },
    /// A resource challenge was scored.
    ResourceGathered {
        /// Node that was harvested.
        node: NodeId,
        /// Credit earned, in whole percent.
        credit_percent: u32,
        /// Resources granted.
        resources: ResourceBundle,
    },
    /// A resource challenge was rejected.
    ChallengeRejected {
        /// Node that was targeted.
        node: NodeId,
        /// Reason for the rejection.
        reason: ChallengeRejection,
    },
    /// The outer game phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// The keep fell.
    GameOver,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaveStarted { wave, .. } => write!(f, "wave_started:{wave}"),
            Self::WaveStartRejected { reason } => write!(f, "wave_start_rejected:{reason}"),
            Self::EnemySpawned { enemy, .. } => write!(f, "enemy_spawned:{enemy}"),
            Self::TypingHit { enemy, .. } => write!(f, "typing_hit:{enemy}"),
            Self::TypingMiss => f.write_str("typing_miss"),
            Self::WordCompleted { enemy, .. } => write!(f, "typing_word_complete:{enemy}"),
            Self::EnemyDefeated { enemy, .. } => write!(f, "enemy_defeated:{enemy}"),
            Self::EnemyBreached { enemy, .. } => write!(f, "enemy_breach:{enemy}"),
            Self::StatusApplied { target, effect, .. } => {
                write!(f, "status_applied:{target}:{effect}")
            }
            Self::StatusExpired { target, effect } => write!(f, "status_expired:{target}:{effect}"),
            Self::StatusDamage { target, damage } => write!(f, "status_damage:{target}:{damage}"),
            Self::ComboMilestone { text } => write!(f, "combo_milestone:{text}"),
            Self::ComboBroken { streak } => write!(f, "combo_broken:{streak}"),
            Self::WaveRepelled { reward, .. } => write!(f, "wave_repelled:{reward}"),
            Self::EndlessUnlocked { day } => write!(f, "endless_unlocked:{day}"),
            Self::EndlessMilestone { name, .. } => write!(f, "endless_milestone:{name}"),
            Self::ResourceGathered {
                node, resources, ..
            } => write!(f, "resource_gathered:{node}:{resources}"),
            Self::ChallengeRejected { node, reason } => {
                write!(f, "challenge_rejected:{node}:{reason}")
            }
            Self::PhaseChanged { phase } => write!(f, "phase_changed:{phase}"),
            Self::GameOver => f.write_str("game_over"),
        }
    }
}

/// Supplies candidate words for enemy assignment.
///
/// The world treats returned strings as opaque; implementations decide which
/// lesson or difficulty the words are drawn from. Returning fewer words than
/// requested is allowed, the world cycles through what it received.
pub trait WordSource {
    /// Produces up to `count` words for the next wave.
    fn words(&mut self, count: usize) -> Vec<String>;
}

impl<F> WordSource for F
where
    F: FnMut(usize) -> Vec<String>,
{
    fn words(&mut self, count: usize) -> Vec<String> {
        self(count)
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Word that defeats the enemy.
    pub word: String,
    /// Remaining hit points.
    pub hp: u32,
    /// Distance left before the enemy reaches the keep.
    pub distance: u32,
    /// Number of characters of the word typed so far.
    pub typed: u32,
    /// Whether the current input targets this enemy.
    pub is_target: bool,
    /// Active status effects and their stack counts.
    pub effects: Vec<(EffectId, u32)>,
}

/// Read-only snapshot describing every live enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DifficultyMode, EffectId, EffectTarget, EnemyId, EnemyKind, Event, ResourceBundle,
        WaveConfig, WaveReward,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wave_config_round_trips_through_bincode() {
        assert_round_trip(&WaveConfig::default());
    }

    #[test]
    fn effect_target_round_trips_through_bincode() {
        assert_round_trip(&EffectTarget::Enemy(EnemyId::new(9)));
        assert_round_trip(&EffectTarget::Player);
    }

    #[test]
    fn unknown_difficulty_resolves_to_adventure() {
        assert_eq!(DifficultyMode::resolve("zen"), DifficultyMode::Zen);
        assert_eq!(DifficultyMode::resolve(" Champion "), DifficultyMode::Champion);
        assert_eq!(DifficultyMode::resolve("impossible"), DifficultyMode::Adventure);
        assert_eq!(DifficultyMode::resolve(""), DifficultyMode::Adventure);
    }

    #[test]
    fn effect_keys_resolve_back_to_ids() {
        for effect in EffectId::ALL {
            assert_eq!(EffectId::from_key(effect.key()), Some(effect));
        }
        assert_eq!(EffectId::from_key("sleepy"), None);
    }

    #[test]
    fn early_days_only_field_light_enemies() {
        for index in 0..16 {
            let kind = EnemyKind::for_spawn(1, index);
            assert!(matches!(kind, EnemyKind::Raider | EnemyKind::Scout));
        }
        assert!((0..16).any(|index| EnemyKind::for_spawn(7, index) == EnemyKind::Brute));
    }

    #[test]
    fn events_render_presentation_tags() {
        let enemy = EnemyId::new(4);
        assert_eq!(
            Event::TypingHit { enemy, typed: 2 }.to_string(),
            "typing_hit:4"
        );
        assert_eq!(Event::TypingMiss.to_string(), "typing_miss");
        assert_eq!(
            Event::WordCompleted { enemy, damage: 3 }.to_string(),
            "typing_word_complete:4"
        );
        assert_eq!(
            Event::ComboMilestone {
                text: "Blazing! x10".to_owned()
            }
            .to_string(),
            "combo_milestone:Blazing! x10"
        );
        let reward = WaveReward {
            gold: 22,
            resources: ResourceBundle::new(8, 4, 4),
        };
        assert_eq!(
            Event::WaveRepelled { wave: 1, reward }.to_string(),
            "wave_repelled:gold=22,wood=8,stone=4,food=4"
        );
        assert_eq!(Event::GameOver.to_string(), "game_over");
    }
}
