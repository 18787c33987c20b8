use std::time::Duration;

use typing_defense_core::{
    Command, DifficultyMode, EffectId, EffectTarget, EnemyId, Event, GamePhase, WaveConfig,
    WaveState,
};
use typing_defense_world::{self as world, query, RecordError, StateRecord, World};

fn run(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn tick(input: Option<&str>) -> Command {
    Command::Tick {
        dt: Duration::from_millis(250),
        input: input.map(str::to_owned),
    }
}

fn opening() -> Vec<Command> {
    vec![
        Command::SetDifficulty {
            mode: DifficultyMode::Champion,
        },
        Command::ApplyStatusEffect {
            target: EffectTarget::Player,
            effect: EffectId::Slow,
        },
        Command::StartWave {
            config: WaveConfig {
                enemy_count: 3,
                spawn_interval: Duration::from_millis(500),
                ..WaveConfig::default()
            },
            words: vec!["lantern".to_owned(), "ladder".to_owned()],
        },
        tick(None),
        tick(None),
        tick(None),
        tick(Some("la")),
        Command::ApplyStatusEffect {
            target: EffectTarget::Enemy(EnemyId::new(0)),
            effect: EffectId::Poisoned,
        },
    ]
}

fn ending() -> Vec<Command> {
    vec![
        tick(Some("lantern")),
        tick(None),
        tick(Some("ladder")),
        tick(None),
        tick(None),
        tick(Some("lantern")),
    ]
}

#[test]
fn saved_world_resumes_identically() {
    let mut original = World::new();
    let _ = run(&mut original, opening());

    let encoded = original.save().expect("world saves");
    let mut restored = World::load(&encoded).expect("world loads");
    assert_eq!(restored.to_record(), original.to_record());
    assert_eq!(query::difficulty(&restored), DifficultyMode::Champion);

    let expected = run(&mut original, ending());
    let resumed = run(&mut restored, ending());
    assert_eq!(resumed, expected);
    assert_eq!(restored.to_record(), original.to_record());
}

#[test]
fn minimal_record_loads_as_a_fresh_world() {
    let record: StateRecord =
        serde_json::from_str(r#"{"version":1,"player_max_health":8}"#).expect("record parses");
    let world = World::from_record(record).expect("record restores");

    assert_eq!(query::player_health(&world), 8);
    assert_eq!(query::player_max_health(&world), 8);
    assert_eq!(query::day(&world), 1);
    assert_eq!(query::phase(&world), GamePhase::Day);
    assert_eq!(query::wave_state(&world), WaveState::Idle);
    assert_eq!(query::difficulty(&world), DifficultyMode::Adventure);
    assert!(query::enemy_view(&world).is_empty());
}

#[test]
fn structural_fields_are_required() {
    assert!(serde_json::from_str::<StateRecord>(r#"{"version":1}"#).is_err());

    let record: StateRecord =
        serde_json::from_str(r#"{"version":1,"player_max_health":0}"#).expect("record parses");
    assert!(matches!(
        World::from_record(record),
        Err(RecordError::InvalidField("player_max_health"))
    ));

    let record: StateRecord =
        serde_json::from_str(r#"{"version":7,"player_max_health":5}"#).expect("record parses");
    assert!(matches!(
        World::from_record(record),
        Err(RecordError::UnsupportedVersion(_))
    ));
}

#[test]
fn inconsistent_optional_fields_are_repaired() {
    let record: StateRecord = serde_json::from_str(
        r#"{
            "version": 1,
            "player_max_health": 6,
            "player_health": 40,
            "day": 0,
            "difficulty": "legendary",
            "combo_current": 9,
            "combo_max": 2,
            "player_effects": [
                { "effect": "burning", "stacks": 50 },
                { "effect": "burning", "stacks": 2, "remaining": { "secs": 1, "nanos": 0 } },
                { "effect": "petrified", "stacks": 1, "remaining": { "secs": 1, "nanos": 0 } }
            ]
        }"#,
    )
    .expect("record parses");

    let world = World::from_record(record).expect("record restores");

    assert_eq!(query::player_health(&world), 6);
    assert_eq!(query::day(&world), 1);
    assert_eq!(query::difficulty(&world), DifficultyMode::Adventure);
    assert_eq!(query::combo_streak(&world), 9);
    assert_eq!(query::max_combo_streak(&world), 9);
    assert_eq!(query::player_effects(&world), vec![(EffectId::Burning, 2)]);
}

#[test]
fn claimed_milestones_are_not_granted_twice() {
    let record: StateRecord = serde_json::from_str(
        r#"{
            "version": 1,
            "player_max_health": 10,
            "day": 30,
            "difficulty": "zen",
            "endless_enabled": true,
            "endless_unlocked": true,
            "endless_day": 4,
            "claimed_milestones": [5]
        }"#,
    )
    .expect("record parses");
    let mut world = World::from_record(record).expect("record restores");
    let gold = query::gold(&world);

    let events = run(
        &mut world,
        vec![
            Command::StartWave {
                config: WaveConfig {
                    cooldown: Duration::ZERO,
                    ..WaveConfig::default()
                },
                words: Vec::new(),
            },
            tick(None),
        ],
    );

    assert_eq!(query::endless_day(&world), 5);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EndlessMilestone { .. })));
    assert_eq!(query::gold(&world), gold + 2);
}

#[test]
fn save_string_header_is_checked() {
    assert!(matches!(World::load(""), Err(RecordError::EmptyPayload)));
    assert!(matches!(
        World::load("game:v1:e30"),
        Err(RecordError::InvalidPrefix(_))
    ));
}
