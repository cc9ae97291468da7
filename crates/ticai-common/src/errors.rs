use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage read error for '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("storage write error for '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("storage serialization error: {0}")]
    Serialization(String),

    #[error("storage path error: {0}")]
    PathError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TicaiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
