use crate::dataset::Dataset;
use crate::normalize::normalize;
use crate::record::Classification;

/// Check if two strings are confusable (their skeletons match).
///
/// Normalization is 1:1 per code point, so strings of different length are
/// never confusable and are rejected before normalizing.
pub fn are_confusable(dataset: &Dataset, a: &str, b: &str, classification: Classification) -> bool {
    if a == b {
        return true;
    }
    if a.chars().count() != b.chars().count() {
        return false;
    }
    normalize(dataset, a, classification) == normalize(dataset, b, classification)
}

/// Every candidate in `candidates` that `text` is confusable with, excluding
/// exact matches. Useful for checking a name against a protected list.
pub fn confusable_matches<'a, I>(
    dataset: &Dataset,
    text: &str,
    candidates: I,
    classification: Classification,
) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let len = text.chars().count();
    let skeleton = normalize(dataset, text, classification);
    candidates
        .into_iter()
        .filter(|c| *c != text && c.chars().count() == len)
        .filter(|c| normalize(dataset, c, classification) == skeleton)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::bundled;

    #[test]
    fn test_zero_ell() {
        let ds = bundled().unwrap();
        assert!(are_confusable(ds, "0l", "Ol", Classification::Major));
    }

    #[test]
    fn test_confusable_domain() {
        // "gіthub.com" with Cyrillic і
        let ds = bundled().unwrap();
        assert!(are_confusable(ds, "g\u{0456}thub.com", "github.com", Classification::Major));
    }

    #[test]
    fn test_reflexive() {
        let ds = bundled().unwrap();
        assert!(are_confusable(ds, "", "", Classification::Major));
        assert!(are_confusable(ds, "anything", "anything", Classification::Minor));
    }

    #[test]
    fn test_length_mismatch() {
        let ds = bundled().unwrap();
        assert!(!are_confusable(ds, "paypal", "paypall", Classification::Major));
    }

    #[test]
    fn test_other_classification_does_not_fold() {
        let ds = bundled().unwrap();
        assert!(!are_confusable(ds, "0l", "Ol", Classification::Minor));
    }

    #[test]
    fn test_different_strings() {
        let ds = bundled().unwrap();
        assert!(!are_confusable(ds, "github", "gitlab", Classification::Major));
    }

    #[test]
    fn test_confusable_matches() {
        let ds = bundled().unwrap();
        let protected = ["paypal.com", "github.com", "google.com"];
        let hits = confusable_matches(
            ds,
            "p\u{0430}yp\u{0430}1.com",
            protected.iter().copied(),
            Classification::Major,
        );
        assert_eq!(hits, vec!["paypal.com"]);
        assert!(confusable_matches(ds, "paypal.com", protected.iter().copied(), Classification::Major).is_empty());
    }
}
