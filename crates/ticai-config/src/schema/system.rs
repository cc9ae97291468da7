//! System configuration types: storage and logging.

use serde::{Deserialize, Serialize};

/// Local key-value store location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Store file path. Empty means the platform data directory.
    pub path: String,
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Tracing filter directive scoped to the ticai crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "ticai=trace",
            LogLevel::Debug => "ticai=debug",
            LogLevel::Info => "ticai=info",
            LogLevel::Warn => "ticai=warn",
            LogLevel::Error => "ticai=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
