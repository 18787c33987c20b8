use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use typing_defense_core::{ResourceBundle, WaveConfig};

/// Settings for a headless simulation run.
///
/// Every field is optional in the TOML file; missing values fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    /// Difficulty identifier, such as `champion`.
    pub(crate) difficulty: String,
    /// Whether endless scaling is enabled once unlocked.
    pub(crate) endless: bool,
    /// Seed for word selection and typist mistakes.
    pub(crate) seed: u64,
    /// Simulated time per tick, in milliseconds.
    pub(crate) tick_ms: u64,
    /// Maximum number of ticks to run.
    pub(crate) ticks: u32,
    /// Number of waves to start.
    pub(crate) waves: u32,
    /// Maximum health of the keep.
    pub(crate) player_health: u32,
    /// Time between two keystrokes of the auto-typist, in milliseconds.
    pub(crate) keystroke_ms: u64,
    /// Probability that a keystroke is correct.
    pub(crate) accuracy: f64,
    /// Overrides applied on top of the stock wave constants.
    pub(crate) wave: WaveSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            difficulty: "adventure".to_owned(),
            endless: false,
            seed: 0x7d5e_11a2,
            tick_ms: 100,
            ticks: 3_000,
            waves: 3,
            player_health: 10,
            keystroke_ms: 200,
            accuracy: 0.93,
            wave: WaveSettings::default(),
        }
    }
}

/// Optional overrides for [`WaveConfig`], with durations in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WaveSettings {
    enemy_count: Option<u32>,
    spawn_interval_ms: Option<u64>,
    step_interval_ms: Option<u64>,
    step_distance: Option<u32>,
    spawn_distance: Option<u32>,
    contact_damage: Option<u32>,
    word_damage: Option<u32>,
    base_gold: Option<u32>,
    per_enemy_gold: Option<u32>,
    per_enemy_wood: Option<u32>,
    per_enemy_stone: Option<u32>,
    per_enemy_food: Option<u32>,
    cooldown_ms: Option<u64>,
}

impl WaveSettings {
    /// Builds a wave configuration from the stock values and these overrides.
    pub(crate) fn to_wave_config(&self) -> WaveConfig {
        let stock = WaveConfig::default();
        let millis = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };
        WaveConfig {
            enemy_count: self.enemy_count.unwrap_or(stock.enemy_count),
            spawn_interval: millis(self.spawn_interval_ms, stock.spawn_interval),
            step_interval: millis(self.step_interval_ms, stock.step_interval),
            step_distance: self.step_distance.unwrap_or(stock.step_distance),
            spawn_distance: self.spawn_distance.unwrap_or(stock.spawn_distance),
            contact_damage: self.contact_damage.unwrap_or(stock.contact_damage),
            word_damage: self.word_damage.unwrap_or(stock.word_damage),
            base_gold: self.base_gold.unwrap_or(stock.base_gold),
            per_enemy_gold: self.per_enemy_gold.unwrap_or(stock.per_enemy_gold),
            per_enemy_resources: ResourceBundle::new(
                self.per_enemy_wood
                    .unwrap_or(stock.per_enemy_resources.wood),
                self.per_enemy_stone
                    .unwrap_or(stock.per_enemy_resources.stone),
                self.per_enemy_food
                    .unwrap_or(stock.per_enemy_resources.food),
            ),
            cooldown: millis(self.cooldown_ms, stock.cooldown),
        }
    }
}

impl SimulationConfig {
    /// Reads and validates a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid simulation config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse simulation config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the simulation cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be greater than zero");
        }
        if self.keystroke_ms == 0 {
            bail!("keystroke_ms must be greater than zero");
        }
        if self.player_health == 0 {
            bail!("player_health must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            bail!("accuracy {} is outside 0.0..=1.0", self.accuracy);
        }
        Ok(())
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub(crate) fn keystroke(&self) -> Duration {
        Duration::from_millis(self.keystroke_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SimulationConfig::parse("").expect("empty config parses");
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.wave.to_wave_config(), WaveConfig::default());
    }

    #[test]
    fn wave_table_overrides_selected_fields() {
        let config = SimulationConfig::parse(
            r#"
            difficulty = "champion"
            seed = 7

            [wave]
            enemy_count = 9
            spawn_interval_ms = 750
            per_enemy_food = 0
            "#,
        )
        .expect("config parses");

        let wave = config.wave.to_wave_config();
        assert_eq!(config.difficulty, "champion");
        assert_eq!(config.seed, 7);
        assert_eq!(wave.enemy_count, 9);
        assert_eq!(wave.spawn_interval, Duration::from_millis(750));
        assert_eq!(wave.per_enemy_resources, ResourceBundle::new(2, 1, 0));
        assert_eq!(wave.cooldown, WaveConfig::default().cooldown);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SimulationConfig::parse("tick_ms = 0").is_err());
        assert!(SimulationConfig::parse("accuracy = 1.5").is_err());
        assert!(SimulationConfig::parse("unknown_field = true").is_err());
    }
}
