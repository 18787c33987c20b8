use std::{collections::BTreeMap, time::Duration};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use typing_defense_core::{
    DifficultyMode, EffectId, EnemyId, EnemyKind, GamePhase, NodeId, ResourceBundle, WaveConfig,
    WaveState,
};
use typing_defense_system_combo::ComboTracker;
use typing_defense_system_status_effects::StatusEffects;

use crate::{
    wave::{Enemy, Wave},
    World, FIRST_DAY,
};

const RECORD_DOMAIN: &str = "td";
const RECORD_HEADER_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Identifier prefix emitted before the encoded record payload.
pub const RECORD_HEADER: &str = "td:v1";
/// Schema version written into every record.
pub const RECORD_VERSION: u32 = 1;

/// Serializable snapshot of a [`World`].
///
/// Only `version` and `player_max_health` are required. Every other field
/// falls back to the value a fresh world would hold, so partially populated
/// records written by older builds still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Schema version of the record.
    pub version: u32,
    /// Maximum health of the keep.
    pub player_max_health: u32,
    /// Current health of the keep, defaulting to full health.
    #[serde(default)]
    pub player_health: Option<u32>,
    /// Day counter.
    #[serde(default = "first_day")]
    pub day: u32,
    /// Waves cleared during the run.
    #[serde(default)]
    pub waves_survived: u32,
    /// Index of the most recently started wave.
    #[serde(default)]
    pub wave_index: u32,
    /// Gold held by the player.
    #[serde(default)]
    pub gold: u32,
    /// Non-gold resources held by the player.
    #[serde(default)]
    pub resources: ResourceBundle,
    /// Difficulty identifier; unknown identifiers load as adventure.
    #[serde(default)]
    pub difficulty: String,
    /// Whether endless mode is enabled.
    #[serde(default)]
    pub endless_enabled: bool,
    /// Whether endless mode has been unlocked.
    #[serde(default)]
    pub endless_unlocked: bool,
    /// Waves cleared while endless scaling applied.
    #[serde(default)]
    pub endless_day: u32,
    /// Endless milestone days already granted.
    #[serde(default)]
    pub claimed_milestones: Vec<u32>,
    /// Current combo streak.
    #[serde(default)]
    pub combo_current: u32,
    /// Best combo streak of the wave.
    #[serde(default)]
    pub combo_max: u32,
    /// Outer game phase.
    #[serde(default)]
    pub phase: GamePhase,
    /// Time left before another wave may start.
    #[serde(default)]
    pub cooldown: Duration,
    /// Status effects on the player.
    #[serde(default)]
    pub player_effects: Vec<EffectRecord>,
    /// Resource nodes still cooling down.
    #[serde(default)]
    pub node_cooldowns: Vec<NodeCooldownRecord>,
    /// Current wave, if one was ever started.
    #[serde(default)]
    pub wave: Option<WaveRecord>,
}

fn first_day() -> u32 {
    FIRST_DAY
}

fn default_stacks() -> u32 {
    1
}

fn default_hp() -> u32 {
    1
}

/// Persisted status effect instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    /// Effect key, such as `burning`.
    pub effect: String,
    /// Stack count.
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Time left before the effect expires.
    #[serde(default)]
    pub remaining: Duration,
}

/// Persisted resource node cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCooldownRecord {
    /// Node cooling down.
    pub node: NodeId,
    /// Time left on the cooldown.
    #[serde(default)]
    pub remaining: Duration,
}

/// Persisted wave state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveRecord {
    /// Lifecycle state.
    pub state: WaveState,
    /// Wave constants before scaling.
    pub config: WaveConfig,
    /// Enemies the wave spawns in total.
    pub total: u32,
    /// Enemies still waiting to spawn.
    pub spawn_remaining: u32,
    /// Time until the next spawn.
    pub spawn_timer: Duration,
    /// Next enemy identifier to assign.
    pub next_id: u32,
    /// Words assigned to spawning enemies.
    pub words: Vec<String>,
    /// Position of the next word to assign.
    pub word_cursor: usize,
    /// Enemies defeated so far.
    pub defeated: u32,
    /// Live enemies.
    pub enemies: Vec<EnemyRecord>,
}

/// Persisted enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    /// Enemy identifier.
    pub id: EnemyId,
    /// Enemy kind.
    pub kind: EnemyKind,
    /// Word that defeats the enemy.
    pub word: String,
    /// Remaining hit points.
    #[serde(default = "default_hp")]
    pub hp: u32,
    /// Distance left before the keep.
    #[serde(default)]
    pub distance: u32,
    /// Characters typed so far.
    #[serde(default)]
    pub typed: u32,
    /// Whether the input targets the enemy.
    #[serde(default)]
    pub is_target: bool,
    /// Movement progress towards the next step.
    #[serde(default)]
    pub step_progress: Duration,
    /// Active status effects.
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
}

/// Errors that can occur while encoding, decoding or restoring records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The provided string was empty or contained only whitespace.
    #[error("save payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("save string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("save string is missing the version")]
    MissingVersion,
    /// The payload segment was missing.
    #[error("save string is missing the payload")]
    MissingPayload,
    /// The prefix segment was not recognised.
    #[error("save prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The header or schema version is not supported.
    #[error("save version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode save payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialized or deserialized.
    #[error("could not parse save payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A required field held an unusable value.
    #[error("save field `{0}` is invalid")]
    InvalidField(&'static str),
}

impl StateRecord {
    /// Encodes the record into a single-line string.
    pub fn encode(&self) -> Result<String, RecordError> {
        let json = serde_json::to_vec(self).map_err(RecordError::InvalidPayload)?;
        Ok(format!("{RECORD_HEADER}:{}", STANDARD_NO_PAD.encode(json)))
    }

    /// Decodes a record from its string representation.
    pub fn decode(value: &str) -> Result<Self, RecordError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RecordError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
        let domain = parts.next().ok_or(RecordError::MissingPrefix)?;
        let version = parts.next().ok_or(RecordError::MissingVersion)?;
        let payload = parts.next().ok_or(RecordError::MissingPayload)?;

        if domain != RECORD_DOMAIN {
            return Err(RecordError::InvalidPrefix(domain.to_owned()));
        }
        if version != RECORD_HEADER_VERSION {
            return Err(RecordError::UnsupportedVersion(version.to_owned()));
        }

        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(RecordError::InvalidEncoding)?;
        serde_json::from_slice(&bytes).map_err(RecordError::InvalidPayload)
    }
}

impl World {
    /// Captures the full world state as a record.
    #[must_use]
    pub fn to_record(&self) -> StateRecord {
        StateRecord {
            version: RECORD_VERSION,
            player_max_health: self.player_max_health,
            player_health: Some(self.player_health),
            day: self.day,
            waves_survived: self.waves_survived,
            wave_index: self.wave_index,
            gold: self.gold,
            resources: self.resources,
            difficulty: self.difficulty.id().to_owned(),
            endless_enabled: self.endless_enabled,
            endless_unlocked: self.endless_unlocked,
            endless_day: self.endless_day,
            claimed_milestones: self.claimed_milestones.clone(),
            combo_current: self.combo.current(),
            combo_max: self.combo.max(),
            phase: self.phase,
            cooldown: self.cooldown,
            player_effects: effect_records(&self.player_effects),
            node_cooldowns: self
                .node_cooldowns
                .iter()
                .map(|(&node, &remaining)| NodeCooldownRecord { node, remaining })
                .collect(),
            wave: Some(wave_record(&self.wave)),
        }
    }

    /// Rebuilds a world from a record, repairing inconsistent optional fields.
    pub fn from_record(record: StateRecord) -> Result<Self, RecordError> {
        if record.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion(record.version.to_string()));
        }
        if record.player_max_health == 0 {
            return Err(RecordError::InvalidField("player_max_health"));
        }

        let mut world = World::with_player_health(record.player_max_health);
        let max_health = world.player_max_health;
        world.player_health = match record.player_health {
            Some(health) if health > max_health => {
                warn!(health, max_health, "clamping player health to maximum");
                max_health
            }
            Some(health) => health,
            None => max_health,
        };

        if record.day < FIRST_DAY {
            warn!(day = record.day, "repairing day counter");
        }
        world.day = record.day.max(FIRST_DAY);
        world.waves_survived = record.waves_survived;
        world.wave_index = record.wave_index;
        world.gold = record.gold;
        world.resources = record.resources;

        world.difficulty = DifficultyMode::resolve(&record.difficulty);
        if !record.difficulty.is_empty()
            && !record.difficulty.eq_ignore_ascii_case(world.difficulty.id())
        {
            warn!(difficulty = %record.difficulty, "unknown difficulty, using adventure");
        }

        world.endless_enabled = record.endless_enabled;
        world.endless_unlocked = record.endless_unlocked;
        world.endless_day = record.endless_day;
        world.claimed_milestones = record.claimed_milestones;
        world.claimed_milestones.sort_unstable();
        world.claimed_milestones.dedup();
        world.combo = ComboTracker::restore(record.combo_current, record.combo_max);
        world.phase = record.phase;
        world.cooldown = record.cooldown;
        world.player_effects = restore_effects(&record.player_effects);
        world.node_cooldowns = record
            .node_cooldowns
            .into_iter()
            .filter(|entry| !entry.remaining.is_zero())
            .map(|entry| (entry.node, entry.remaining))
            .collect::<BTreeMap<_, _>>();
        if let Some(wave) = record.wave {
            world.wave = restore_wave(wave);
        }

        if world.player_health == 0 && world.phase != GamePhase::GameOver {
            warn!("keep has no health left, restoring as game over");
            world.phase = GamePhase::GameOver;
        }
        if world.phase == GamePhase::GameOver && world.wave.state.is_running() {
            world.wave.state = WaveState::Breached;
        }
        Ok(world)
    }

    /// Encodes the world into a save string.
    pub fn save(&self) -> Result<String, RecordError> {
        self.to_record().encode()
    }

    /// Restores a world from a save string produced by [`World::save`].
    pub fn load(value: &str) -> Result<Self, RecordError> {
        Self::from_record(StateRecord::decode(value)?)
    }
}

fn effect_records(effects: &StatusEffects) -> Vec<EffectRecord> {
    effects
        .iter()
        .map(|instance| EffectRecord {
            effect: instance.effect().key().to_owned(),
            stacks: instance.stacks(),
            remaining: instance.remaining(),
        })
        .collect()
}

fn restore_effects(records: &[EffectRecord]) -> StatusEffects {
    let mut effects = StatusEffects::new();
    for record in records {
        match EffectId::from_key(&record.effect) {
            Some(effect) => effects.restore(effect, record.stacks, record.remaining),
            None => warn!(effect = %record.effect, "skipping unknown status effect"),
        }
    }
    effects
}

fn wave_record(wave: &Wave) -> WaveRecord {
    WaveRecord {
        state: wave.state,
        config: wave.config.clone(),
        total: wave.total,
        spawn_remaining: wave.spawn_remaining,
        spawn_timer: wave.spawn_timer,
        next_id: wave.next_id,
        words: wave.words.clone(),
        word_cursor: wave.word_cursor,
        defeated: wave.defeated,
        enemies: wave
            .enemies
            .iter()
            .map(|enemy| EnemyRecord {
                id: enemy.id,
                kind: enemy.kind,
                word: enemy.word.clone(),
                hp: enemy.hp,
                distance: enemy.distance,
                typed: enemy.typed,
                is_target: enemy.is_target,
                step_progress: enemy.step_progress,
                effects: effect_records(&enemy.effects),
            })
            .collect(),
    }
}

fn restore_wave(record: WaveRecord) -> Wave {
    let mut enemies: Vec<Enemy> = Vec::with_capacity(record.enemies.len());
    for enemy in record.enemies {
        if enemy.hp == 0 {
            warn!(enemy = %enemy.id, "dropping defeated enemy from record");
            continue;
        }
        let mut restored = Enemy {
            id: enemy.id,
            kind: enemy.kind,
            word: enemy.word,
            hp: enemy.hp,
            distance: enemy.distance.max(1),
            typed: enemy.typed,
            is_target: enemy.is_target,
            step_progress: enemy.step_progress,
            effects: restore_effects(&enemy.effects),
        };
        if restored.typed > restored.word_len() {
            warn!(enemy = %restored.id, typed = restored.typed, "clamping typed progress");
            restored.typed = restored.word_len();
        }
        enemies.push(restored);
    }
    enemies.sort_by_key(|enemy| enemy.id);
    enemies.dedup_by_key(|enemy| enemy.id);

    let next_id = enemies
        .last()
        .map_or(0, |enemy| enemy.id.get().saturating_add(1))
        .max(record.next_id);
    let spawn_remaining = record.spawn_remaining;
    let state = match record.state {
        WaveState::Spawning if spawn_remaining == 0 => WaveState::Active,
        WaveState::Active if spawn_remaining > 0 => WaveState::Spawning,
        state => state,
    };

    Wave {
        state,
        config: record.config,
        total: record.total.max(spawn_remaining),
        spawn_remaining,
        spawn_timer: record.spawn_timer,
        enemies,
        next_id,
        words: record.words,
        word_cursor: record.word_cursor,
        defeated: record.defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_records_carry_the_header() {
        let encoded = World::new().save().expect("record encodes");
        assert!(encoded.starts_with(&format!("{RECORD_HEADER}:")));
        assert_eq!(
            StateRecord::decode(&encoded).expect("record decodes"),
            World::new().to_record()
        );
    }

    #[test]
    fn decode_rejects_malformed_strings() {
        assert!(matches!(
            StateRecord::decode("   "),
            Err(RecordError::EmptyPayload)
        ));
        assert!(matches!(
            StateRecord::decode("td"),
            Err(RecordError::MissingVersion)
        ));
        assert!(matches!(
            StateRecord::decode("td:v1"),
            Err(RecordError::MissingPayload)
        ));
        assert!(matches!(
            StateRecord::decode("game:v1:abc"),
            Err(RecordError::InvalidPrefix(prefix)) if prefix == "game"
        ));
        assert!(matches!(
            StateRecord::decode("td:v9:abc"),
            Err(RecordError::UnsupportedVersion(version)) if version == "v9"
        ));
        assert!(matches!(
            StateRecord::decode("td:v1:!!!"),
            Err(RecordError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn restoring_drops_defeated_enemies_and_clamps_typing() {
        let record = WaveRecord {
            state: WaveState::Active,
            next_id: 1,
            enemies: vec![
                EnemyRecord {
                    id: EnemyId::new(4),
                    kind: EnemyKind::Scout,
                    word: "oak".to_owned(),
                    hp: 2,
                    distance: 5,
                    typed: 9,
                    is_target: true,
                    step_progress: Duration::ZERO,
                    effects: vec![EffectRecord {
                        effect: "molten".to_owned(),
                        stacks: 1,
                        remaining: Duration::from_secs(1),
                    }],
                },
                EnemyRecord {
                    id: EnemyId::new(2),
                    kind: EnemyKind::Raider,
                    word: "elm".to_owned(),
                    hp: 0,
                    distance: 5,
                    typed: 0,
                    is_target: false,
                    step_progress: Duration::ZERO,
                    effects: Vec::new(),
                },
            ],
            ..WaveRecord::default()
        };

        let wave = restore_wave(record);
        assert_eq!(wave.enemies.len(), 1);
        assert_eq!(wave.enemies[0].typed, 3);
        assert!(wave.enemies[0].effects.is_empty());
        assert_eq!(wave.next_id, 5);
    }
}
