use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use typing_defense_core::WordSource;

const LEXICON: [&str; 32] = [
    "anvil", "arrow", "banner", "barrel", "bridge", "candle", "castle", "cave", "cellar",
    "copper", "ember", "falcon", "forest", "forge", "garden", "harbor", "helmet", "lantern",
    "ledger", "marsh", "meadow", "orchard", "quarry", "raven", "rampart", "saddle", "shield",
    "spire", "thatch", "timber", "tower", "willow",
];

/// Seeded word supply standing in for the lesson content collaborator.
#[derive(Clone, Debug)]
pub(crate) struct SeededWords {
    rng: ChaCha8Rng,
}

impl SeededWords {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws a single word, used for resource node challenges.
    pub(crate) fn draw(&mut self) -> String {
        LEXICON
            .choose(&mut self.rng)
            .map_or_else(String::new, |word| (*word).to_owned())
    }
}

impl WordSource for SeededWords {
    fn words(&mut self, count: usize) -> Vec<String> {
        LEXICON
            .choose_multiple(&mut self.rng, count.min(LEXICON.len()))
            .map(|word| (*word).to_owned())
            .collect()
    }
}
