//! Skeleton normalization: each mapped character is replaced by the first
//! element of its target list. The mapping is 1:1 per code point, so output
//! length (in chars) always equals input length.

use crate::dataset::Dataset;
use crate::record::Classification;

fn fold(dataset: &Dataset, ch: char, filter: Option<Classification>) -> Option<char> {
    let record = dataset.record(ch)?;
    match filter {
        Some(c) if !record.matches(c) => None,
        _ => record.primary(),
    }
}

fn normalize_with(dataset: &Dataset, text: &str, filter: Option<Classification>) -> NormalizedText {
    let mut normalized = String::with_capacity(text.len());
    let mut replaced = 0;
    for ch in text.chars() {
        match fold(dataset, ch, filter) {
            Some(t) => {
                normalized.push(t);
                replaced += 1;
            }
            None => normalized.push(ch),
        }
    }
    NormalizedText {
        raw: text.to_string(),
        normalized,
        replaced,
    }
}

/// Canonical form under a single classification. `Classification::Major` is
/// the form used for homograph comparison.
pub fn normalize(dataset: &Dataset, text: &str, classification: Classification) -> String {
    normalize_with(dataset, text, Some(classification)).normalized
}

/// Maximally folded form: every mapped character is replaced, whatever its
/// classification.
pub fn normalize_all(dataset: &Dataset, text: &str) -> String {
    normalize_with(dataset, text, None).normalized
}

/// Like [`normalize`], but also reports how many characters were replaced.
/// Pass `None` to fold every classification.
pub fn normalize_detailed(
    dataset: &Dataset,
    text: &str,
    classification: Option<Classification>,
) -> NormalizedText {
    normalize_with(dataset, text, classification)
}

/// Result of normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub raw: String,
    pub normalized: String,
    /// Number of code points that were replaced.
    pub replaced: usize,
}

impl NormalizedText {
    pub fn changed(&self) -> bool {
        self.replaced > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::bundled;
    use crate::record::ConfusableRecord;

    fn mixed() -> Dataset {
        Dataset::from_records(
            "test",
            "test",
            vec![
                ConfusableRecord::new('0', vec!['O'], Classification::Major),
                ConfusableRecord::new('\u{0261}', vec!['g'], Classification::Minor),
                ConfusableRecord::new('\u{0430}', vec!['a', '\u{0251}'], Classification::CrossScript),
                ConfusableRecord::new('\u{1D7CF}', vec!['l'], Classification::Major),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_paypal() {
        let ds = bundled().unwrap();
        assert_eq!(normalize(ds, "paypa1", Classification::Major), "paypal");
    }

    #[test]
    fn test_cyrillic_domain() {
        // "gіthub.com" with Cyrillic і
        let ds = bundled().unwrap();
        assert_eq!(
            normalize(ds, "g\u{0456}thub.com", Classification::Major),
            "github.com"
        );
    }

    #[test]
    fn test_classification_filter() {
        let ds = mixed();
        let input = "0\u{0261}\u{0430}";
        assert_eq!(normalize(&ds, input, Classification::Major), "O\u{0261}\u{0430}");
        assert_eq!(normalize(&ds, input, Classification::Minor), "0g\u{0430}");
        assert_eq!(normalize(&ds, input, Classification::CrossScript), "0\u{0261}a");
    }

    #[test]
    fn test_normalize_all() {
        let ds = mixed();
        assert_eq!(normalize_all(&ds, "0\u{0261}\u{0430}x"), "Ogax");
    }

    #[test]
    fn test_astral_not_split() {
        let ds = mixed();
        let out = normalize(&ds, "a\u{1D7CF}b", Classification::Major);
        assert_eq!(out, "alb");
        assert_eq!(out.chars().count(), 3);
    }

    #[test]
    fn test_unmapped_passthrough() {
        let ds = mixed();
        assert_eq!(normalize(&ds, "hello, world", Classification::Major), "hello, world");
        assert_eq!(normalize(&ds, "", Classification::Major), "");
        assert_eq!(normalize_all(&ds, ""), "");
    }

    #[test]
    fn test_detailed_counts_replacements() {
        let ds = mixed();
        let result = normalize_detailed(&ds, "0\u{0261}0", Some(Classification::Major));
        assert_eq!(result.raw, "0\u{0261}0");
        assert_eq!(result.normalized, "O\u{0261}O");
        assert_eq!(result.replaced, 2);
        assert!(result.changed());

        let untouched = normalize_detailed(&ds, "abc", None);
        assert!(!untouched.changed());
    }
}
