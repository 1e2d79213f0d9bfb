use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UTS #39 confidence tier of a confusable mapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Classification {
    /// High-confidence visual confusable.
    #[default]
    #[serde(rename = "MA")]
    Major,
    /// Lower-confidence confusable.
    #[serde(rename = "MI")]
    Minor,
    /// Cross-script or other.
    #[serde(rename = "X")]
    CrossScript,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Major,
        Classification::Minor,
        Classification::CrossScript,
    ];

    /// The tag used by the upstream table.
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Major => "MA",
            Classification::Minor => "MI",
            Classification::CrossScript => "X",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MA" => Ok(Classification::Major),
            "MI" => Ok(Classification::Minor),
            "X" => Ok(Classification::CrossScript),
            other => Err(format!("unknown classification: {other}")),
        }
    }
}

/// One source character's confusable mapping.
///
/// `target` is ordered; the first element is the primary substitution used
/// for normalization. A validated record never has an empty target and never
/// lists its own source as a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusableRecord {
    pub source: char,
    pub target: Vec<char>,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConfusableRecord {
    pub fn new(source: char, target: Vec<char>, classification: Classification) -> Self {
        Self {
            source,
            target,
            classification,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The canonical replacement character.
    pub fn primary(&self) -> Option<char> {
        self.target.first().copied()
    }

    pub fn matches(&self, classification: Classification) -> bool {
        self.classification == classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_tags() {
        assert_eq!(Classification::Major.to_string(), "MA");
        assert_eq!(Classification::Minor.to_string(), "MI");
        assert_eq!(Classification::CrossScript.to_string(), "X");
        assert_eq!(Classification::default(), Classification::Major);
    }

    #[test]
    fn test_classification_parse() {
        assert_eq!("ma".parse::<Classification>(), Ok(Classification::Major));
        assert_eq!(" X ".parse::<Classification>(), Ok(Classification::CrossScript));
        assert!("SL".parse::<Classification>().is_err());
    }

    #[test]
    fn test_classification_serde() {
        let json = serde_json::to_string(&Classification::Minor).unwrap();
        assert_eq!(json, "\"MI\"");
        let back: Classification = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(back, Classification::CrossScript);
    }

    #[test]
    fn test_record_serde() {
        let record = ConfusableRecord::new('0', vec!['O'], Classification::Major);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"source":"0","target":["O"],"classification":"MA"}"#);

        let described: ConfusableRecord = serde_json::from_str(
            r#"{"source":"\u2163","target":["l","V"],"classification":"MA","description":"four"}"#,
        )
        .unwrap();
        assert_eq!(described.source, '\u{2163}');
        assert_eq!(described.target, vec!['l', 'V']);
        assert_eq!(described.description.as_deref(), Some("four"));
    }

    #[test]
    fn test_primary_target() {
        let record = ConfusableRecord::new('\u{2474}', vec!['(', 'l', ')'], Classification::Major);
        assert_eq!(record.primary(), Some('('));
        assert!(record.matches(Classification::Major));
        assert!(!record.matches(Classification::Minor));
    }
}
