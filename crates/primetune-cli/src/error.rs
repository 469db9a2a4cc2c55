use primetune::engine::config::ConfigError;
use primetune::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scorer command: {0}")]
    ScorerCommand(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
