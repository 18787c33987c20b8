use std::time::Duration;

use typing_defense_core::{Command, DifficultyMode, Event, WaveConfig};
use typing_defense_world::{self as world, query, StateRecord, World};

fn zen_world(endless: bool) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetDifficulty {
            mode: DifficultyMode::Zen,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetEndlessEnabled { enabled: endless },
        &mut events,
    );
    assert!(events.is_empty());
    world
}

fn clear_wave(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::StartWave {
            config: WaveConfig {
                cooldown: Duration::ZERO,
                ..WaveConfig::default()
            },
            words: Vec::new(),
        },
        &mut events,
    );
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
            input: None,
        },
        &mut events,
    );
    events
}

#[test]
fn endless_unlocks_on_day_fifteen() {
    let mut world = zen_world(false);
    let mut log = Vec::new();
    for _ in 0..13 {
        log.extend(clear_wave(&mut world));
    }
    assert_eq!(query::day(&world), 14);
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::EndlessUnlocked { .. })));

    let events = clear_wave(&mut world);
    assert!(events.contains(&Event::EndlessUnlocked { day: 15 }));
    assert!(!query::endless_active(&world), "endless stays off until enabled");

    let mut toggled = Vec::new();
    world::apply(
        &mut world,
        Command::SetEndlessEnabled { enabled: true },
        &mut toggled,
    );
    assert!(toggled.is_empty(), "unlock is announced once");
    assert!(query::endless_active(&world));
}

#[test]
fn endless_days_grant_milestones_once() {
    let mut world = zen_world(true);
    for _ in 0..14 {
        let _ = clear_wave(&mut world);
    }
    assert!(query::endless_active(&world));
    assert_eq!(query::endless_day(&world), 0);

    let mut log = Vec::new();
    for _ in 0..10 {
        log.extend(clear_wave(&mut world));
    }

    let milestones: Vec<(u32, String, u32)> = log
        .iter()
        .filter_map(|event| match event {
            Event::EndlessMilestone { day, name, gold } => Some((*day, name.clone(), *gold)),
            _ => None,
        })
        .collect();
    assert_eq!(
        milestones,
        vec![
            (5, "Enduring".to_owned(), 500),
            (10, "Steadfast".to_owned(), 1_000),
        ]
    );
    assert_eq!(query::endless_day(&world), 10);
}

#[test]
fn enabling_endless_before_unlock_changes_nothing() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetEndlessEnabled { enabled: true },
        &mut events,
    );
    assert!(events.is_empty());
    assert!(!query::endless_active(&world));
    let config = WaveConfig {
        enemy_count: 10,
        ..WaveConfig::default()
    };
    assert_eq!(query::planned_wave_size(&world, &config), 10);
}

#[test]
fn endless_days_scale_wave_size() {
    let record: StateRecord = serde_json::from_str(
        r#"{
            "version": 1,
            "player_max_health": 10,
            "day": 20,
            "endless_enabled": true,
            "endless_unlocked": true,
            "endless_day": 10
        }"#,
    )
    .expect("record parses");
    let world = World::from_record(record).expect("record restores");
    let config = WaveConfig {
        enemy_count: 10,
        ..WaveConfig::default()
    };

    assert!(query::endless_active(&world));
    assert_eq!(query::planned_wave_size(&world, &config), 15);
}
