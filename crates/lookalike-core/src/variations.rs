//! Combinatorial variation generation.
//!
//! Every position with an eligible mapping can independently keep its
//! character or take any one of its targets. The result is the Cartesian
//! product of those choices, which grows multiplicatively with input length.
//! [`generate_variations`] materializes all of it; callers facing untrusted
//! input should use [`estimate_variations`] or [`generate_variations_bounded`]
//! first, or walk the lazy [`Variations`] iterator.

use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::error::VariationError;
use crate::record::Classification;

/// Unbounded requests estimated above this size are logged at WARN.
pub const VARIATION_WARN_THRESHOLD: u128 = 100_000;

/// Per-position choices: the original character first, then each distinct
/// target of an eligible record.
fn alternatives(dataset: &Dataset, text: &str, classification: Classification) -> Vec<Vec<char>> {
    text.chars()
        .map(|ch| {
            let mut choices = vec![ch];
            if let Some(record) = dataset.record(ch).filter(|r| r.matches(classification)) {
                for &t in &record.target {
                    if !choices.contains(&t) {
                        choices.push(t);
                    }
                }
            }
            choices
        })
        .collect()
}

fn product(alternatives: &[Vec<char>]) -> u128 {
    alternatives
        .iter()
        .fold(1u128, |acc, choices| acc.saturating_mul(choices.len() as u128))
}

/// Upper bound on the number of variations `text` expands to. Saturates at
/// `u128::MAX`.
pub fn estimate_variations(dataset: &Dataset, text: &str, classification: Classification) -> u128 {
    product(&alternatives(dataset, text, classification))
}

/// All distinct variations of `text`, including `text` itself.
///
/// No truncation or sampling is applied: the full set is the contract.
pub fn generate_variations(
    dataset: &Dataset,
    text: &str,
    classification: Classification,
) -> HashSet<String> {
    let iter = Variations::new(dataset, text, classification);
    let estimated = iter.estimated();
    if estimated > VARIATION_WARN_THRESHOLD {
        tracing::warn!(
            estimated = %estimated,
            input_chars = text.chars().count(),
            "materializing a large variation set; bound the input or use generate_variations_bounded"
        );
    }
    iter.collect()
}

/// Like [`generate_variations`], but refuses before allocating when the
/// expansion would exceed `limit`.
pub fn generate_variations_bounded(
    dataset: &Dataset,
    text: &str,
    classification: Classification,
    limit: usize,
) -> Result<HashSet<String>, VariationError> {
    let iter = Variations::new(dataset, text, classification);
    let estimated = iter.estimated();
    if estimated > limit as u128 {
        return Err(VariationError::TooMany { estimated, limit });
    }
    Ok(iter.collect())
}

/// Lazy walk over the variation space in odometer order (rightmost position
/// changes fastest). The original string is always yielded first and each
/// distinct variation is yielded exactly once.
#[derive(Debug, Clone)]
pub struct Variations {
    alternatives: Vec<Vec<char>>,
    indices: Vec<usize>,
    done: bool,
}

impl Variations {
    pub fn new(dataset: &Dataset, text: &str, classification: Classification) -> Self {
        let alternatives = alternatives(dataset, text, classification);
        let indices = vec![0; alternatives.len()];
        Self {
            alternatives,
            indices,
            done: false,
        }
    }

    /// Total size of the space (saturating).
    pub fn estimated(&self) -> u128 {
        product(&self.alternatives)
    }

    /// Rewind to the first variation.
    pub fn restart(&mut self) {
        self.indices.iter_mut().for_each(|i| *i = 0);
        self.done = false;
    }

    fn current(&self) -> String {
        self.indices
            .iter()
            .zip(&self.alternatives)
            .map(|(&i, choices)| choices[i])
            .collect()
    }

    fn advance(&mut self) {
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.alternatives[pos].len() {
                return;
            }
            self.indices[pos] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Variations {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let item = self.current();
        self.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConfusableRecord;

    fn dataset() -> Dataset {
        Dataset::from_records(
            "test",
            "test",
            vec![
                ConfusableRecord::new('a', vec!['\u{0430}'], Classification::Major),
                ConfusableRecord::new('o', vec!['0', '\u{03BF}'], Classification::Major),
                ConfusableRecord::new('e', vec!['\u{0435}'], Classification::Minor),
                ConfusableRecord::new('\u{2034}', vec!['\u{2032}', '\u{2032}', '\u{2032}'], Classification::Major),
            ],
        )
        .unwrap()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_eligible_position() {
        let ds = dataset();
        let result = generate_variations(&ds, "ab", Classification::Major);
        assert_eq!(result, set(&["ab", "\u{0430}b"]));
    }

    #[test]
    fn test_cartesian_product() {
        let ds = dataset();
        let result = generate_variations(&ds, "ao", Classification::Major);
        assert_eq!(
            result,
            set(&["ao", "a0", "a\u{03BF}", "\u{0430}o", "\u{0430}0", "\u{0430}\u{03BF}"])
        );
        assert_eq!(estimate_variations(&ds, "ao", Classification::Major), 6);
    }

    #[test]
    fn test_no_eligible_positions() {
        let ds = dataset();
        assert_eq!(generate_variations(&ds, "xyz", Classification::Major), set(&["xyz"]));
    }

    #[test]
    fn test_empty_input() {
        let ds = dataset();
        assert_eq!(generate_variations(&ds, "", Classification::Major), set(&[""]));
        assert_eq!(estimate_variations(&ds, "", Classification::Major), 1);
    }

    #[test]
    fn test_classification_filter() {
        let ds = dataset();
        assert_eq!(generate_variations(&ds, "e", Classification::Major), set(&["e"]));
        assert_eq!(
            generate_variations(&ds, "e", Classification::Minor),
            set(&["e", "\u{0435}"])
        );
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let ds = dataset();
        let result = generate_variations(&ds, "\u{2034}", Classification::Major);
        assert_eq!(result, set(&["\u{2034}", "\u{2032}"]));
    }

    #[test]
    fn test_iterator_original_first_and_distinct() {
        let ds = dataset();
        let all: Vec<String> = Variations::new(&ds, "oao", Classification::Major).collect();
        assert_eq!(all[0], "oao");
        assert_eq!(all.len(), 18);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_iterator_restart() {
        let ds = dataset();
        let mut iter = Variations::new(&ds, "a", Classification::Major);
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next().as_deref(), Some("\u{0430}"));
        assert_eq!(iter.next(), None);
        iter.restart();
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_bounded_refuses() {
        let ds = dataset();
        let err = generate_variations_bounded(&ds, "oooo", Classification::Major, 80).unwrap_err();
        assert_eq!(err, VariationError::TooMany { estimated: 81, limit: 80 });

        let ok = generate_variations_bounded(&ds, "oooo", Classification::Major, 81).unwrap();
        assert_eq!(ok.len(), 81);
    }

    #[test]
    fn test_estimate_saturates() {
        let ds = dataset();
        let long = "o".repeat(200);
        assert_eq!(estimate_variations(&ds, &long, Classification::Major), u128::MAX);
    }
}
