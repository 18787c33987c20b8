use std::time::Duration;

use typing_defense_core::{EnemyId, EnemyKind, EnemySnapshot, WaveConfig, WaveState};
use typing_defense_system_status_effects::StatusEffects;
use typing_defense_system_typing as typing;

/// Enemy owned exclusively by the running wave.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) word: String,
    pub(crate) hp: u32,
    pub(crate) distance: u32,
    pub(crate) typed: u32,
    pub(crate) is_target: bool,
    pub(crate) step_progress: Duration,
    pub(crate) effects: StatusEffects,
}

impl Enemy {
    pub(crate) fn word_len(&self) -> u32 {
        u32::try_from(self.word.chars().count()).unwrap_or(u32::MAX)
    }

    pub(crate) fn clear_typing(&mut self) {
        self.typed = 0;
        self.is_target = false;
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            word: self.word.clone(),
            hp: self.hp,
            distance: self.distance,
            typed: self.typed,
            is_target: self.is_target,
            effects: self
                .effects
                .iter()
                .map(|instance| (instance.effect(), instance.stacks()))
                .collect(),
        }
    }
}

/// Spawn queue, live enemies and counters of the current wave.
#[derive(Clone, Debug, Default)]
pub(crate) struct Wave {
    pub(crate) state: WaveState,
    pub(crate) config: WaveConfig,
    pub(crate) total: u32,
    pub(crate) spawn_remaining: u32,
    pub(crate) spawn_timer: Duration,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) next_id: u32,
    pub(crate) words: Vec<String>,
    pub(crate) word_cursor: usize,
    pub(crate) defeated: u32,
}

impl Wave {
    pub(crate) fn begin(config: WaveConfig, total: u32, words: Vec<String>) -> Self {
        let words = words
            .iter()
            .filter_map(|word| typing::normalize(word))
            .collect();
        let state = if total == 0 {
            WaveState::Active
        } else {
            WaveState::Spawning
        };
        Self {
            state,
            config,
            total,
            spawn_remaining: total,
            spawn_timer: Duration::ZERO,
            enemies: Vec::new(),
            next_id: 0,
            words,
            word_cursor: 0,
            defeated: 0,
        }
    }

    /// Counts the spawn timer down and reports whether an enemy is due.
    pub(crate) fn spawn_due(&mut self, dt: Duration) -> bool {
        if self.state != WaveState::Spawning || self.spawn_remaining == 0 {
            return false;
        }
        self.spawn_timer = self.spawn_timer.saturating_sub(dt);
        self.spawn_timer.is_zero()
    }

    /// Takes the next word, cycling when the content ran short.
    pub(crate) fn next_word(&mut self, fallback: EnemyKind) -> String {
        if self.words.is_empty() {
            return format!("{fallback:?}").to_lowercase();
        }
        let word = self.words[self.word_cursor % self.words.len()].clone();
        self.word_cursor = self.word_cursor.wrapping_add(1);
        word
    }

    pub(crate) fn push_enemy(&mut self, kind: EnemyKind, word: String, hp: u32) -> &Enemy {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.spawn_remaining = self.spawn_remaining.saturating_sub(1);
        self.spawn_timer = self.config.spawn_interval;
        if self.spawn_remaining == 0 {
            self.state = WaveState::Active;
        }
        self.enemies.push(Enemy {
            id,
            kind,
            word,
            hp: hp.max(1),
            distance: self.config.spawn_distance.max(1),
            typed: 0,
            is_target: false,
            step_progress: Duration::ZERO,
            effects: StatusEffects::new(),
        });
        let index = self.enemies.len() - 1;
        &self.enemies[index]
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
            .map(|index| &mut self.enemies[index])
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
            .map(|index| self.enemies.remove(index))
    }

    /// Reports whether every enemy has spawned and none remain alive.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.spawn_remaining == 0 && self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(total: u32, words: &[&str]) -> Wave {
        let config = WaveConfig {
            spawn_interval: Duration::from_secs(2),
            ..WaveConfig::default()
        };
        Wave::begin(
            config,
            total,
            words.iter().map(|word| (*word).to_owned()).collect(),
        )
    }

    #[test]
    fn first_spawn_is_due_immediately_then_waits_for_interval() {
        let mut wave = wave(2, &["oak"]);
        assert!(wave.spawn_due(Duration::from_millis(16)));
        let _ = wave.push_enemy(EnemyKind::Raider, "oak".to_owned(), 3);
        assert!(!wave.spawn_due(Duration::from_secs(1)));
        assert!(wave.spawn_due(Duration::from_secs(1)));
    }

    #[test]
    fn spawning_last_enemy_activates_wave() {
        let mut wave = wave(1, &["oak"]);
        assert_eq!(wave.state, WaveState::Spawning);
        let _ = wave.push_enemy(EnemyKind::Scout, "oak".to_owned(), 2);
        assert_eq!(wave.state, WaveState::Active);
        assert!(!wave.spawn_due(Duration::from_secs(10)));
    }

    #[test]
    fn words_cycle_when_content_runs_short() {
        let mut wave = wave(3, &["ash", "elm"]);
        let drawn: Vec<String> = (0..3).map(|_| wave.next_word(EnemyKind::Raider)).collect();
        assert_eq!(drawn, vec!["ash", "elm", "ash"]);

        let mut empty = self::wave(1, &[]);
        assert_eq!(empty.next_word(EnemyKind::Brute), "brute");
    }

    #[test]
    fn enemy_ids_increase_in_spawn_order() {
        let mut wave = wave(3, &["a", "b", "c"]);
        for _ in 0..3 {
            let word = wave.next_word(EnemyKind::Raider);
            let _ = wave.push_enemy(EnemyKind::Raider, word, 1);
        }
        let ids: Vec<u32> = wave.enemies.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(wave.remove(EnemyId::new(1)).is_some());
        assert!(wave.enemy_mut(EnemyId::new(2)).is_some());
        assert!(wave.remove(EnemyId::new(1)).is_none());
    }
}
