use thiserror::Error;

use super::config::ConfigError;
use crate::core::score::ScoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Search configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Scoring failed: {source}")]
    Scoring {
        #[from]
        source: ScoreError,
    },

    #[error("Failed to build the worker pool: {0}")]
    WorkerPool(String),

    #[error("No candidate inside [{min_value}, {max_value}] was ever scored")]
    NoCandidates { min_value: u64, max_value: u64 },
}
