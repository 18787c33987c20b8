use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use typing_defense_core::EnemyView;

const TYPO_KEYS: &[u8] = b"qxzjvkw";

/// Simulated player that types towards the closest enemy.
///
/// The typist presses at most one key per keystroke interval. A wrong key is
/// corrected on the following keystroke by clearing the input.
#[derive(Clone, Debug)]
pub(crate) struct AutoTypist {
    rng: ChaCha8Rng,
    accuracy: f64,
    keystroke: Duration,
    elapsed: Duration,
    buffer: String,
}

impl AutoTypist {
    pub(crate) fn new(seed: u64, accuracy: f64, keystroke: Duration) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            keystroke,
            elapsed: Duration::ZERO,
            buffer: String::new(),
        }
    }

    /// Advances the typist clock and returns the new input when it changed.
    pub(crate) fn next_input(&mut self, dt: Duration, enemies: &EnemyView) -> Option<String> {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.keystroke {
            return None;
        }
        self.elapsed = (self.elapsed - self.keystroke).min(self.keystroke);

        let target = enemies
            .iter()
            .min_by_key(|enemy| (enemy.distance, enemy.id))
            .map(|enemy| enemy.word.to_lowercase());
        let Some(word) = target else {
            return self.clear();
        };
        if !word.starts_with(&self.buffer) {
            return self.clear();
        }
        let Some(next) = word.chars().nth(self.buffer.chars().count()) else {
            return self.clear();
        };

        let key = self.key_for(next);
        self.buffer.push(key);
        Some(self.buffer.clone())
    }

    /// Types `target` in one go, with each character subject to typos.
    pub(crate) fn attempt(&mut self, target: &str) -> String {
        target.chars().map(|expected| self.key_for(expected)).collect()
    }

    fn key_for(&mut self, expected: char) -> char {
        if self.rng.gen_bool(self.accuracy) {
            return expected;
        }
        let typo = char::from(TYPO_KEYS[self.rng.gen_range(0..TYPO_KEYS.len())]);
        if typo == expected {
            '#'
        } else {
            typo
        }
    }

    fn clear(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            self.buffer.clear();
            Some(String::new())
        }
    }
}
