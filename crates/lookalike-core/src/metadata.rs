use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::{Classification, ConfusableRecord};

/// Record counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    #[serde(rename = "MA")]
    pub major: usize,
    #[serde(rename = "MI")]
    pub minor: usize,
    #[serde(rename = "X")]
    pub cross_script: usize,
}

impl ClassificationCounts {
    pub fn get(&self, classification: Classification) -> usize {
        match classification {
            Classification::Major => self.major,
            Classification::Minor => self.minor,
            Classification::CrossScript => self.cross_script,
        }
    }

    pub fn total(&self) -> usize {
        self.major + self.minor + self.cross_script
    }

    fn bump(&mut self, classification: Classification) {
        match classification {
            Classification::Major => self.major += 1,
            Classification::Minor => self.minor += 1,
            Classification::CrossScript => self.cross_script += 1,
        }
    }
}

/// Provenance and size of a dataset. Computed once when the dataset is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: String,
    pub date: String,
    pub total_mappings: usize,
    pub reverse_entries: usize,
    pub classifications: ClassificationCounts,
}

impl Metadata {
    pub(crate) fn compute(
        version: &str,
        date: &str,
        confusables: &HashMap<char, ConfusableRecord>,
        reverse: &HashMap<char, Vec<char>>,
    ) -> Self {
        let mut classifications = ClassificationCounts::default();
        for record in confusables.values() {
            classifications.bump(record.classification);
        }
        Self {
            version: version.to_string(),
            date: date.to_string(),
            total_mappings: confusables.len(),
            reverse_entries: reverse.len(),
            classifications,
        }
    }
}
