use crate::core::score::{Direction, Scorer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Sentinel for an effectively unbounded upper search window.
pub const UNBOUNDED_MAX: u64 = u64::MAX;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse options file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Plain, possibly-invalid search options as supplied by a user or an
/// options file. Out-of-range values are not rejected; they select the
/// documented defaults when normalized into a [`SearchConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchOptions {
    /// Smallest parameter value allowed to be scored. Values below 2 are
    /// clamped to 2.
    pub min_value: i64,
    /// Largest parameter value allowed to be scored. Any value below 2
    /// selects an unbounded upper window.
    pub max_value: i64,
    /// Number of prime-seeded lineages. Values below 1 select the available
    /// hardware parallelism.
    pub branches: i64,
    /// Whether to maximize the score (`false` minimizes).
    pub maximize: bool,
    /// Whether to log every processed candidate and its score.
    pub verbose: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_value: 2,
            max_value: -1,
            branches: -1,
            maximize: true,
            verbose: false,
        }
    }
}

impl SearchOptions {
    /// Loads options from a TOML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Validated, immutable configuration for one search run.
#[derive(Clone)]
pub struct SearchConfig {
    pub min_value: u64,
    pub max_value: u64,
    pub branches: usize,
    pub direction: Direction,
    pub verbose: bool,
    pub scorer: Arc<dyn Scorer>,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Normalizes `options` by clamping rather than rejecting: this never
    /// fails.
    pub fn from_options(options: &SearchOptions, scorer: Arc<dyn Scorer>) -> Self {
        let branches = if options.branches < 1 {
            default_parallelism()
        } else {
            options.branches as usize
        };

        let min_value = if options.min_value < 2 {
            2
        } else {
            options.min_value as u64
        };

        let max_value = if options.max_value < 2 {
            UNBOUNDED_MAX
        } else {
            options.max_value as u64
        };

        Self {
            min_value,
            max_value,
            branches,
            direction: Direction::from_maximize(options.maximize),
            verbose: options.verbose,
            scorer,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_value == UNBOUNDED_MAX
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("branches", &self.branches)
            .field("direction", &self.direction)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    options: SearchOptions,
    scorer: Option<Arc<dyn Scorer>>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all plain options at once, e.g. with options loaded from a
    /// file. Later per-field setters still apply on top.
    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn min_value(mut self, min_value: i64) -> Self {
        self.options.min_value = min_value;
        self
    }

    pub fn max_value(mut self, max_value: i64) -> Self {
        self.options.max_value = max_value;
        self
    }

    pub fn branches(mut self, branches: i64) -> Self {
        self.options.branches = branches;
        self
    }

    pub fn maximize(mut self, maximize: bool) -> Self {
        self.options.maximize = maximize;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    pub fn scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Some(Arc::new(scorer));
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let scorer = self
            .scorer
            .ok_or(ConfigError::MissingParameter("scorer"))?;
        Ok(SearchConfig::from_options(&self.options, scorer))
    }
}

pub(crate) fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
