use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};
use typing_defense_core::{Command, DifficultyMode, Event, GamePhase, NodeId, ResourceBundle};
use typing_defense_world::{self as world, query, World};

use crate::{config::SimulationConfig, typist::AutoTypist, words::SeededWords};

const RESOURCE_NODES: u32 = 3;

/// Totals reported at the end of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u32,
    pub(crate) waves_started: u32,
    pub(crate) waves_survived: u32,
    pub(crate) day: u32,
    pub(crate) gold: u32,
    pub(crate) resources: ResourceBundle,
    pub(crate) player_health: u32,
    pub(crate) game_over: bool,
}

/// Headless driver pairing a world with a seeded word supply and typist.
pub(crate) struct Simulation {
    config: SimulationConfig,
    words: SeededWords,
    typist: AutoTypist,
    waves_started: u32,
}

impl Simulation {
    pub(crate) fn new(config: SimulationConfig) -> Self {
        let words = SeededWords::new(config.seed);
        let typist = AutoTypist::new(
            config.seed.rotate_left(17),
            config.accuracy,
            config.keystroke(),
        );
        Self {
            config,
            words,
            typist,
            waves_started: 0,
        }
    }

    /// Applies the configured difficulty and endless flag to `world`.
    pub(crate) fn prepare(&self, world: &mut World, log: &mut impl Write) -> Result<()> {
        let mode = DifficultyMode::resolve(&self.config.difficulty);
        if !mode.id().eq_ignore_ascii_case(self.config.difficulty.trim()) {
            info!(requested = %self.config.difficulty, %mode, "unknown difficulty, falling back");
        }
        let mut events = Vec::new();
        world::apply(world, Command::SetDifficulty { mode }, &mut events);
        world::apply(
            world,
            Command::SetEndlessEnabled {
                enabled: self.config.endless,
            },
            &mut events,
        );
        write_events(&events, log)
    }

    /// Runs until the tick budget is spent, the waves are done or the keep falls.
    pub(crate) fn run(&mut self, world: &mut World, log: &mut impl Write) -> Result<Summary> {
        let dt = self.config.tick();
        let wave_config = self.config.wave.to_wave_config();
        let mut ticks = 0;

        while ticks < self.config.ticks && query::phase(world) != GamePhase::GameOver {
            let mut events = Vec::new();
            if self.ready_for_wave(world) {
                if self.waves_started == self.config.waves {
                    break;
                }
                self.waves_started += 1;
                world::start_wave(world, wave_config.clone(), &mut self.words, &mut events);
            }

            let input = self.typist.next_input(dt, &query::enemy_view(world));
            if let Some(text) = &input {
                debug!(input = %text, "typist input");
            }
            world::combat_tick(world, dt, input.as_deref(), &mut events);
            ticks += 1;

            if events
                .iter()
                .any(|event| matches!(event, Event::WaveRepelled { .. }))
            {
                self.gather(world, &mut events);
            }
            write_events(&events, log)?;
        }

        Ok(Summary {
            ticks,
            waves_started: self.waves_started,
            waves_survived: query::waves_survived(world),
            day: query::day(world),
            gold: query::gold(world),
            resources: query::resources(world),
            player_health: query::player_health(world),
            game_over: query::phase(world) == GamePhase::GameOver,
        })
    }

    fn ready_for_wave(&self, world: &World) -> bool {
        query::phase(world) == GamePhase::Day && query::wave_cooldown(world).is_zero()
    }

    /// Works a resource node between waves.
    fn gather(&mut self, world: &mut World, events: &mut Vec<Event>) {
        let target = self.words.draw();
        let submitted = self.typist.attempt(&target);
        world::apply(
            world,
            Command::SubmitChallenge {
                node: NodeId::new(query::waves_survived(world) % RESOURCE_NODES),
                target,
                submitted,
                reward: ResourceBundle::new(4, 2, 2),
                cooldown: self.config.wave.to_wave_config().cooldown * RESOURCE_NODES,
            },
            events,
        );
    }
}

fn write_events(events: &[Event], log: &mut impl Write) -> Result<()> {
    for event in events {
        writeln!(log, "{event}")?;
    }
    Ok(())
}
