use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::dataset::{self, Dataset};
use crate::error::{DatasetError, VariationError};
use crate::random::{RandomOptions, DEFAULT_PROBABILITY};
use crate::record::Classification;
use crate::variations;

/// Env var naming a config file that overrides discovery.
pub const CONFIG_ENV: &str = "LOOKALIKE_CONFIG";

const DEFAULT_MAX_VARIATIONS: usize = 100_000;

/// Try both `.yaml` and `.yml` extensions in a directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    let yaml = dir.join("config.yaml");
    if yaml.exists() {
        return Some(yaml);
    }
    let yml = dir.join("config.yml");
    if yml.exists() {
        return Some(yml);
    }
    None
}

/// Runtime settings loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path this config was loaded from.
    #[serde(skip)]
    pub path: Option<PathBuf>,

    /// Classification used for normalization, comparison and variations.
    pub classification: Classification,

    /// Per-character substitution probability for randomization.
    pub probability: f64,

    /// Never substitute these characters in randomization.
    pub exclude: Vec<char>,

    /// Refuse variation requests whose estimated size exceeds this.
    /// `None` disables the bound.
    pub max_variations: Option<usize>,

    /// Dataset document to use instead of the bundled snapshot.
    pub dataset_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            classification: Classification::Major,
            probability: DEFAULT_PROBABILITY,
            exclude: Vec::new(),
            max_variations: Some(DEFAULT_MAX_VARIATIONS),
            dataset_path: None,
        }
    }
}

impl Config {
    /// Discover and load config: `LOOKALIKE_CONFIG`, then `.lookalike/` up to
    /// the repo root, then the user config dir. Falls back to defaults.
    pub fn discover(cwd: Option<&Path>) -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from_path(&path);
            }
            tracing::warn!(path = %path.display(), "{CONFIG_ENV} points at a missing file");
        }

        match discover_config_path(cwd) {
            Some(path) => Self::load_from_path(&path),
            None => match user_config_path() {
                Some(user_path) => Self::load_from_path(&user_path),
                None => Config::default(),
            },
        }
    }

    /// Load a config file. Unreadable or unparsable files yield defaults.
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(mut c) => {
                    c.path = Some(path.to_path_buf());
                    c
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config");
                Config::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// The configured dataset, or the bundled snapshot.
    pub fn load_dataset(&self) -> Result<Cow<'static, Dataset>, DatasetError> {
        match &self.dataset_path {
            Some(path) => {
                let path = self.resolve(path);
                Dataset::load(&path).map(Cow::Owned)
            }
            None => dataset::bundled()
                .map(Cow::Borrowed)
                .map_err(|e| DatasetError::Bundled(e.to_string())),
        }
    }

    /// Randomization options from this config.
    pub fn random_options(&self) -> RandomOptions {
        RandomOptions {
            classification: Some(self.classification),
            exclude: self.exclude.iter().copied().collect::<HashSet<char>>(),
            probability: self.probability,
        }
    }

    /// Variations under the configured classification and bound.
    pub fn variations(
        &self,
        dataset: &Dataset,
        text: &str,
    ) -> Result<HashSet<String>, VariationError> {
        match self.max_variations {
            Some(limit) => {
                variations::generate_variations_bounded(dataset, text, self.classification, limit)
            }
            None => Ok(variations::generate_variations(dataset, text, self.classification)),
        }
    }

    /// Relative dataset paths are taken relative to the config file.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Discover config path by walking up from cwd to .git boundary.
fn discover_config_path(cwd: Option<&Path>) -> Option<PathBuf> {
    let start = cwd
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;

    let mut current = start.as_path();
    loop {
        if let Some(candidate) = find_config_in_dir(&current.join(".lookalike")) {
            return Some(candidate);
        }

        // Check for .git boundary (directory or file for worktrees)
        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

/// Get user-level config path.
fn user_config_path() -> Option<PathBuf> {
    find_config_in_dir(&config_dir()?)
}

/// Get lookalike config directory.
pub fn config_dir() -> Option<PathBuf> {
    let base = etcetera::choose_base_strategy().ok()?;
    Some(base.config_dir().join("lookalike"))
}
