use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a data directory for the score table")]
    NoDataDir,

    #[error("score table I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize score record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt record at {path:?} line {line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level error returned from `main`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("could not start logging: {0}")]
    Logging(String),
}
