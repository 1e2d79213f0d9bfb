//! The confusable dataset: an immutable, validated mapping from source
//! characters to their confusable records, plus the precomputed reverse index.
//!
//! The persisted form is a [`DatasetDocument`] (JSON). The bundled snapshot is
//! compiled from `assets/data/confusables.txt` by `build.rs` and validated the
//! first time [`bundled`] is called.

use once_cell::sync::Lazy;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use crate::error::DatasetError;
use crate::metadata::Metadata;
use crate::record::{Classification, ConfusableRecord};

const BUNDLED_DOCUMENT: &str = include_str!(concat!(env!("OUT_DIR"), "/confusables.json"));

static BUNDLED: Lazy<Result<Dataset, DatasetError>> =
    Lazy::new(|| Dataset::from_json(BUNDLED_DOCUMENT));

/// The snapshot shipped with the crate, built once per process.
pub fn bundled() -> Result<&'static Dataset, &'static DatasetError> {
    BUNDLED.as_ref()
}

/// Serialized shape of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDocument {
    pub source: String,
    pub target: Vec<String>,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Serialized shape of the whole dataset.
///
/// Deserializing rejects a repeated key in either map instead of keeping the
/// last occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct DatasetDocument {
    pub version: String,
    pub date: String,
    pub confusables: BTreeMap<String, RecordDocument>,
    #[serde(rename = "reverseLookup")]
    pub reverse_lookup: BTreeMap<String, Vec<String>>,
}

/// JSON object entries in document order, repeated keys included.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct RawDocument {
    version: String,
    date: String,
    confusables: Entries<RecordDocument>,
    #[serde(rename = "reverseLookup")]
    reverse_lookup: Entries<Vec<String>>,
}

impl TryFrom<RawDocument> for DatasetDocument {
    type Error = DatasetError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let mut confusables = BTreeMap::new();
        for (key, record) in raw.confusables.0 {
            if confusables.contains_key(&key) {
                return Err(match single_char(&key) {
                    Some(source_char) => DatasetError::DuplicateSource { source_char },
                    None => DatasetError::InvalidKey { key },
                });
            }
            confusables.insert(key, record);
        }

        let mut reverse_lookup = BTreeMap::new();
        for (key, sources) in raw.reverse_lookup.0 {
            if reverse_lookup.contains_key(&key) {
                return Err(DatasetError::ReverseMismatch {
                    target: key,
                    detail: "key listed twice".to_string(),
                });
            }
            reverse_lookup.insert(key, sources);
        }

        Ok(Self {
            version: raw.version,
            date: raw.date,
            confusables,
            reverse_lookup,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    version: String,
    date: String,
    confusables: HashMap<char, ConfusableRecord>,
    reverse: HashMap<char, Vec<char>>,
    metadata: Metadata,
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn check_record(record: &ConfusableRecord) -> Result<(), DatasetError> {
    if record.target.is_empty() {
        return Err(DatasetError::EmptyTarget {
            source_char: record.source,
        });
    }
    if record.target.contains(&record.source) {
        return Err(DatasetError::SelfMapping {
            source_char: record.source,
        });
    }
    Ok(())
}

impl Dataset {
    /// Build a dataset from records, deriving the reverse index in record order.
    pub fn from_records<I>(
        version: impl Into<String>,
        date: impl Into<String>,
        records: I,
    ) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = ConfusableRecord>,
    {
        let mut confusables = HashMap::new();
        let mut reverse: HashMap<char, Vec<char>> = HashMap::new();

        for record in records {
            check_record(&record)?;
            if confusables.contains_key(&record.source) {
                return Err(DatasetError::DuplicateSource {
                    source_char: record.source,
                });
            }
            for &t in &record.target {
                let sources = reverse.entry(t).or_default();
                if !sources.contains(&record.source) {
                    sources.push(record.source);
                }
            }
            confusables.insert(record.source, record);
        }

        Ok(Self::assemble(version.into(), date.into(), confusables, reverse))
    }

    /// Validate a deserialized document. The document's reverse index must
    /// agree exactly with its forward mappings.
    pub fn from_document(document: DatasetDocument) -> Result<Self, DatasetError> {
        let mut confusables = HashMap::with_capacity(document.confusables.len());

        for (key, doc) in document.confusables {
            let source = single_char(&key).ok_or_else(|| DatasetError::InvalidKey { key: key.clone() })?;
            if single_char(&doc.source) != Some(source) {
                return Err(DatasetError::SourceMismatch {
                    key,
                    source_char: doc.source,
                });
            }
            let target = doc
                .target
                .into_iter()
                .map(|t| {
                    single_char(&t).ok_or(DatasetError::InvalidTarget {
                        source_char: source,
                        target: t,
                    })
                })
                .collect::<Result<Vec<char>, _>>()?;

            let record = ConfusableRecord {
                source,
                target,
                classification: doc.classification,
                description: doc.description,
            };
            check_record(&record)?;
            confusables.insert(source, record);
        }

        let mut reverse: HashMap<char, Vec<char>> =
            HashMap::with_capacity(document.reverse_lookup.len());
        for (key, sources) in document.reverse_lookup {
            let target = single_char(&key).ok_or_else(|| DatasetError::ReverseMismatch {
                target: key.clone(),
                detail: "key is not exactly one character".to_string(),
            })?;
            if sources.is_empty() {
                return Err(DatasetError::ReverseMismatch {
                    target: key,
                    detail: "empty source list".to_string(),
                });
            }
            let mut list = Vec::with_capacity(sources.len());
            for s in sources {
                let mismatch = |detail: String| DatasetError::ReverseMismatch {
                    target: key.clone(),
                    detail,
                };
                let source = single_char(&s)
                    .ok_or_else(|| mismatch(format!("source {s:?} is not exactly one character")))?;
                let maps_here = confusables
                    .get(&source)
                    .is_some_and(|r| r.target.contains(&target));
                if !maps_here {
                    return Err(mismatch(format!("{s:?} has no mapping to this target")));
                }
                if list.contains(&source) {
                    return Err(mismatch(format!("{s:?} listed twice")));
                }
                list.push(source);
            }
            reverse.insert(target, list);
        }

        for record in confusables.values() {
            for t in &record.target {
                let indexed = reverse.get(t).is_some_and(|s| s.contains(&record.source));
                if !indexed {
                    return Err(DatasetError::ReverseMismatch {
                        target: t.to_string(),
                        detail: format!("missing source {:?}", record.source),
                    });
                }
            }
        }

        Ok(Self::assemble(document.version, document.date, confusables, reverse))
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Self::from_document(DatasetDocument::try_from(raw)?)
    }

    /// Read and validate a dataset document from disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn assemble(
        version: String,
        date: String,
        confusables: HashMap<char, ConfusableRecord>,
        reverse: HashMap<char, Vec<char>>,
    ) -> Self {
        let metadata = Metadata::compute(&version, &date, &confusables, &reverse);
        tracing::debug!(
            version = %version,
            mappings = confusables.len(),
            reverse_entries = reverse.len(),
            "confusable dataset loaded"
        );
        Self {
            version,
            date,
            confusables,
            reverse,
            metadata,
        }
    }

    /// Serialize back into the persisted document shape.
    pub fn to_document(&self) -> DatasetDocument {
        let confusables = self
            .confusables
            .values()
            .map(|r| {
                let doc = RecordDocument {
                    source: r.source.to_string(),
                    target: r.target.iter().map(char::to_string).collect(),
                    classification: r.classification,
                    description: r.description.clone(),
                };
                (r.source.to_string(), doc)
            })
            .collect();
        let reverse_lookup = self
            .reverse
            .iter()
            .map(|(t, sources)| (t.to_string(), sources.iter().map(char::to_string).collect()))
            .collect();
        DatasetDocument {
            version: self.version.clone(),
            date: self.date.clone(),
            confusables,
            reverse_lookup,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn len(&self) -> usize {
        self.confusables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confusables.is_empty()
    }

    /// All records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &ConfusableRecord> {
        self.confusables.values()
    }

    pub fn reverse_index(&self) -> &HashMap<char, Vec<char>> {
        &self.reverse
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn record_for(&self, ch: char) -> Option<&ConfusableRecord> {
        self.confusables.get(&ch)
    }

    pub(crate) fn sources_for(&self, ch: char) -> &[char] {
        self.reverse.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }
}
