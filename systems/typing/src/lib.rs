#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure typing resolution: prefix matching against live enemies and
//! edit-distance scoring for resource challenges.

use typing_defense_core::EnemyId;

/// Normalizes raw input for matching.
///
/// Surrounding whitespace is stripped and letters are lowercased. Returns
/// `None` when nothing typeable remains.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Matching state computed for a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyMatch {
    /// Enemy the state applies to.
    pub enemy: EnemyId,
    /// Characters of the enemy's word covered by the input.
    pub typed: u32,
    /// Whether the input is a prefix of the enemy's word.
    pub is_target: bool,
    /// Whether the input spells the entire word.
    pub complete: bool,
}

/// Result of resolving one input against every live enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    matches: Vec<EnemyMatch>,
    typed_input: bool,
}

impl MatchReport {
    /// Per-enemy state in the order the enemies were supplied.
    #[must_use]
    pub fn matches(&self) -> &[EnemyMatch] {
        &self.matches
    }

    /// Enemies whose words start with the input.
    pub fn targets(&self) -> impl Iterator<Item = &EnemyMatch> {
        self.matches.iter().filter(|entry| entry.is_target)
    }

    /// Enemies whose words were typed in full.
    pub fn completed(&self) -> impl Iterator<Item = &EnemyMatch> {
        self.matches.iter().filter(|entry| entry.complete)
    }

    /// Reports whether non-empty input matched no enemy.
    #[must_use]
    pub fn is_miss(&self) -> bool {
        self.typed_input && !self.matches.iter().any(|entry| entry.is_target)
    }
}

/// Resolves `raw` input against `(enemy, word)` pairs.
///
/// Every enemy whose word begins with the normalized input becomes a target,
/// so several enemies sharing a prefix are all marked. Non-matching enemies
/// report zero typed characters. Empty input clears every enemy.
pub fn resolve<'a, I>(raw: &str, enemies: I) -> MatchReport
where
    I: IntoIterator<Item = (EnemyId, &'a str)>,
{
    let input = normalize(raw);
    let typed_len = input.as_deref().map_or(0, |text| text.chars().count());

    let matches = enemies
        .into_iter()
        .map(|(enemy, word)| {
            let word = normalize(word);
            let is_target = input
                .as_deref()
                .zip(word.as_deref())
                .is_some_and(|(text, word)| word.starts_with(text));
            if is_target {
                let typed = u32::try_from(typed_len).unwrap_or(u32::MAX);
                let word_len = word.as_deref().map_or(0, |word| word.chars().count());
                EnemyMatch {
                    enemy,
                    typed,
                    is_target,
                    complete: typed_len == word_len,
                }
            } else {
                EnemyMatch {
                    enemy,
                    typed: 0,
                    is_target: false,
                    complete: false,
                }
            }
        })
        .collect();

    MatchReport {
        matches,
        typed_input: input.is_some(),
    }
}

/// Levenshtein edit distance between two strings, counted in characters.
#[must_use]
pub fn edit_distance(left: &str, right: &str) -> usize {
    let right_chars: Vec<char> = right.chars().collect();
    let mut previous: Vec<usize> = (0..=right_chars.len()).collect();
    let mut current = vec![0; right_chars.len() + 1];

    for (row, left_char) in left.chars().enumerate() {
        current[0] = row + 1;
        for (column, right_char) in right_chars.iter().enumerate() {
            let substitution = previous[column] + usize::from(left_char != *right_char);
            let insertion = current[column] + 1;
            let deletion = previous[column + 1] + 1;
            current[column + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right_chars.len()]
}

/// Largest edit distance that still earns partial credit for `target`.
#[must_use]
pub fn tolerance(target: &str) -> usize {
    target.chars().count().div_ceil(2).max(1)
}

/// Converts a submitted word into a credit fraction in `[0, 1]`.
///
/// An exact match earns full credit. Each edit removes an equal share of the
/// credit, and submissions further than [`tolerance`] edits away earn nothing.
#[must_use]
pub fn partial_credit(submitted: &str, target: &str) -> f64 {
    let (Some(submitted), Some(target)) = (normalize(submitted), normalize(target)) else {
        return 0.0;
    };

    let distance = edit_distance(&submitted, &target);
    if distance == 0 {
        return 1.0;
    }
    if distance > tolerance(&target) {
        return 0.0;
    }

    let length = submitted.chars().count().max(target.chars().count());
    (1.0 - distance as f64 / length as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_counts_insertions_deletions_and_substitutions() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "oak"), 3);
        assert_eq!(edit_distance("stone", "stone"), 0);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn partial_credit_degrades_with_distance() {
        assert!((partial_credit("timber", "timber") - 1.0).abs() < f64::EPSILON);
        let one_off = partial_credit("timbr", "timber");
        assert!((one_off - 5.0 / 6.0).abs() < 1e-9);
        let two_off = partial_credit("tmbr", "timber");
        assert!(two_off < one_off);
        assert!(two_off > 0.0);
        assert_eq!(partial_credit("quartz", "timber"), 0.0);
        assert_eq!(partial_credit("   ", "timber"), 0.0);
    }

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(normalize("  CaS \t").as_deref(), Some("cas"));
        assert_eq!(normalize(" \n "), None);
    }
}
