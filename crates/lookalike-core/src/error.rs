use std::path::PathBuf;

/// A dataset document failed to load or failed validation.
///
/// A corrupt table silently produces wrong answers to security questions, so
/// every variant here is fatal to construction.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("mapping key {key:?} is not exactly one character")]
    InvalidKey { key: String },

    #[error("mapping key {key:?} holds a record for source {source_char:?}")]
    SourceMismatch { key: String, source_char: String },

    #[error("source {source_char:?} has an empty target list")]
    EmptyTarget { source_char: char },

    #[error("source {source_char:?} has target {target:?}, which is not exactly one character")]
    InvalidTarget { source_char: char, target: String },

    #[error("source {source_char:?} lists itself as a target")]
    SelfMapping { source_char: char },

    #[error("duplicate record for source {source_char:?}")]
    DuplicateSource { source_char: char },

    #[error("reverse index disagrees with mappings at {target:?}: {detail}")]
    ReverseMismatch { target: String, detail: String },

    #[error("bundled dataset unavailable: {0}")]
    Bundled(String),
}

/// Refusal from the bounded variation generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariationError {
    #[error("input would expand to {estimated} variations, above the limit of {limit}")]
    TooMany { estimated: u128, limit: usize },
}
