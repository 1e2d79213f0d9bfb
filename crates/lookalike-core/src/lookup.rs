//! Single-character forward and reverse lookup.
//!
//! The `&str` forms consider only the first code point of their input, so
//! characters outside the Basic Multilingual Plane are looked up whole.
//! Absence is never an error: an empty input or an unmapped character yields
//! `None` / an empty slice.

use crate::dataset::Dataset;
use crate::record::ConfusableRecord;

impl Dataset {
    /// Record whose source is `ch`.
    pub fn record(&self, ch: char) -> Option<&ConfusableRecord> {
        self.record_for(ch)
    }

    /// Sources that list `ch` among their targets, in insertion order.
    pub fn sources_of(&self, ch: char) -> &[char] {
        self.sources_for(ch)
    }

    pub fn lookup_forward(&self, text: &str) -> Option<&ConfusableRecord> {
        text.chars().next().and_then(|c| self.record(c))
    }

    pub fn lookup_reverse(&self, text: &str) -> &[char] {
        match text.chars().next() {
            Some(c) => self.sources_of(c),
            None => &[],
        }
    }

    /// Whether `ch` has a mapping of any classification.
    pub fn is_confusable(&self, ch: char) -> bool {
        self.record(ch).is_some()
    }
}
