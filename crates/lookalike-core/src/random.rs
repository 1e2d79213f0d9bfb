//! Randomized confusable substitution for building adversarial samples.
//!
//! The RNG is owned by a caller-constructed [`Randomizer`], so tests can seed
//! it and production code can draw from entropy. Substitution never fails:
//! anything without an eligible replacement comes back unchanged.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::record::Classification;

pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Options for random substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomOptions {
    /// Only substitute characters whose record has this classification.
    pub classification: Option<Classification>,
    /// Characters that must never be chosen as a replacement.
    pub exclude: HashSet<char>,
    /// Per-character chance of attempting a substitution.
    pub probability: f64,
}

impl Default for RandomOptions {
    fn default() -> Self {
        Self {
            classification: None,
            exclude: HashSet::new(),
            probability: DEFAULT_PROBABILITY,
        }
    }
}

impl RandomOptions {
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn excluding<I: IntoIterator<Item = char>>(mut self, chars: I) -> Self {
        self.exclude.extend(chars);
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// `probability` clamped to `[0, 1]`; NaN counts as 0.
    pub fn effective_probability(&self) -> f64 {
        if self.probability.is_nan() {
            0.0
        } else {
            self.probability.clamp(0.0, 1.0)
        }
    }
}

/// Random substitution driven by an owned RNG.
#[derive(Debug, Clone)]
pub struct Randomizer<R = StdRng> {
    rng: R,
}

impl Randomizer<StdRng> {
    /// Deterministic generator for reproducible samples.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Randomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Pick a random replacement for `ch`, or return `ch` when no record,
    /// classification or exclusion leaves an eligible target.
    pub fn substitute(&mut self, dataset: &Dataset, ch: char, options: &RandomOptions) -> char {
        let Some(record) = dataset.record(ch) else {
            return ch;
        };
        if let Some(classification) = options.classification {
            if !record.matches(classification) {
                return ch;
            }
        }
        let eligible: Vec<char> = record
            .target
            .iter()
            .copied()
            .filter(|t| !options.exclude.contains(t))
            .collect();
        eligible.choose(&mut self.rng).copied().unwrap_or(ch)
    }

    /// String form of [`Randomizer::substitute`]: only the first character of
    /// `text` is considered. Empty input yields an empty string.
    pub fn random_confusable(&mut self, dataset: &Dataset, text: &str, options: &RandomOptions) -> String {
        match text.chars().next() {
            Some(ch) => self.substitute(dataset, ch, options).to_string(),
            None => String::new(),
        }
    }

    /// Independently, with `options.probability`, substitute each character.
    /// Output has the same number of characters as `text`.
    pub fn randomize(&mut self, dataset: &Dataset, text: &str, options: &RandomOptions) -> String {
        let probability = options.effective_probability();
        text.chars()
            .map(|ch| {
                if self.rng.gen_bool(probability) {
                    self.substitute(dataset, ch, options)
                } else {
                    ch
                }
            })
            .collect()
    }
}
