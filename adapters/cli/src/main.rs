#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless typing defense simulation.

mod config;
mod simulation;
mod typist;
mod words;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typing_defense_world::{query, World};

use crate::{config::SimulationConfig, simulation::Simulation};

/// Drives the typing defense engine with a seeded auto-typist.
#[derive(Debug, Parser)]
#[command(name = "typing-defense", version, about)]
struct Cli {
    /// TOML file with simulation settings
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Difficulty mode identifier (story, adventure, champion, nightmare, zen)
    #[arg(short, long, value_name = "MODE")]
    difficulty: Option<String>,

    /// Enable endless scaling once it unlocks
    #[arg(long)]
    endless: bool,

    /// Seed for word selection and typist mistakes
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate
    #[arg(long)]
    ticks: Option<u32>,

    /// Number of waves to start
    #[arg(long)]
    waves: Option<u32>,

    /// Probability that a keystroke is correct
    #[arg(long)]
    accuracy: Option<f64>,

    /// Resume from a save string stored in this file
    #[arg(long, value_name = "PATH")]
    resume: Option<PathBuf>,

    /// Print the encoded save string after the run
    #[arg(long)]
    save: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(difficulty) = &self.difficulty {
            config.difficulty.clone_from(difficulty);
        }
        if self.endless {
            config.endless = true;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(waves) = self.waves {
            config.waves = waves;
        }
        if let Some(accuracy) = self.accuracy {
            config.accuracy = accuracy;
        }
        config.validate().context("invalid command-line overrides")?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_world(cli: &Cli, config: &SimulationConfig) -> Result<World> {
    let Some(path) = &cli.resume else {
        return Ok(World::with_player_health(config.player_health));
    };
    let encoded = fs::read_to_string(path)
        .with_context(|| format!("failed to read save file at {}", path.display()))?;
    let world = World::load(&encoded)
        .with_context(|| format!("failed to restore save file at {}", path.display()))?;
    info!(path = %path.display(), day = query::day(&world), "resumed saved run");
    Ok(world)
}

/// Entry point for the typing defense command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.simulation_config()?;
    let mut world = load_world(&cli, &config)?;
    println!("{}", query::welcome_banner(&world));

    let stdout = io::stdout();
    let mut log = stdout.lock();
    let mut simulation = Simulation::new(config);
    simulation.prepare(&mut world, &mut log)?;
    let summary = simulation.run(&mut world, &mut log)?;

    info!(
        ticks = summary.ticks,
        waves_started = summary.waves_started,
        waves_survived = summary.waves_survived,
        day = summary.day,
        gold = summary.gold,
        resources = %summary.resources,
        health = summary.player_health,
        game_over = summary.game_over,
        "simulation finished"
    );

    if cli.save {
        let encoded = world.save().context("failed to encode save string")?;
        writeln!(log, "{encoded}")?;
    }
    Ok(())
}
