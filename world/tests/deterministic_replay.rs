use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use typing_defense_core::{
    Command, DifficultyMode, EffectId, EffectTarget, EnemyId, EnemyKind, EnemySnapshot, Event,
    WaveConfig,
};
use typing_defense_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(!first.events.is_empty());
}

#[test]
fn changing_the_script_changes_the_fingerprint() {
    let baseline = replay(scripted_commands());
    let mut commands = scripted_commands();
    commands.insert(
        0,
        Command::SetDifficulty {
            mode: DifficultyMode::Story,
        },
    );
    let altered = replay(commands);

    assert_ne!(baseline.fingerprint(), altered.fingerprint());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let enemies = query::enemy_view(&world)
        .into_vec()
        .into_iter()
        .map(EnemyState::from)
        .collect();

    ReplayOutcome {
        enemies,
        events: events.iter().map(ToString::to_string).collect(),
        health: query::player_health(&world),
        gold: query::gold(&world),
        day: query::day(&world),
    }
}

fn tick(millis: u64, input: Option<&str>) -> Command {
    Command::Tick {
        dt: Duration::from_millis(millis),
        input: input.map(str::to_owned),
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::StartWave {
            config: WaveConfig {
                enemy_count: 5,
                spawn_interval: Duration::from_millis(400),
                spawn_distance: 6,
                ..WaveConfig::default()
            },
            words: ["orbit", "ocean", "oxide", "quill"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        },
        tick(200, None),
        tick(200, Some("o")),
        tick(200, Some("oc")),
        Command::ApplyStatusEffect {
            target: EffectTarget::Enemy(EnemyId::new(0)),
            effect: EffectId::Slow,
        },
        tick(200, Some("ocean")),
        tick(200, Some("x")),
        Command::ApplyStatusEffect {
            target: EffectTarget::Enemy(EnemyId::new(2)),
            effect: EffectId::Bleeding,
        },
        tick(500, None),
        tick(500, Some("orbit")),
        tick(1_000, None),
        tick(1_000, Some("quill")),
        tick(2_000, None),
        tick(2_000, None),
        tick(3_000, None),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    enemies: Vec<EnemyState>,
    events: Vec<String>,
    health: u32,
    gold: u32,
    day: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EnemyState {
    id: u32,
    kind: EnemyKind,
    hp: u32,
    distance: u32,
    typed: u32,
}

impl From<EnemySnapshot> for EnemyState {
    fn from(snapshot: EnemySnapshot) -> Self {
        Self {
            id: snapshot.id.get(),
            kind: snapshot.kind,
            hp: snapshot.hp,
            distance: snapshot.distance,
            typed: snapshot.typed,
        }
    }
}
