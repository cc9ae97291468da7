//! Configuration schema types for TicAI.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod ai;
mod limits;
mod rate_limit;
mod system;

pub use ai::*;
pub use limits::*;
pub use rate_limit::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for TicAI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct TicaiConfig {
    pub limits: LimitsConfig,
    pub rate_limit: RateLimitConfig,
    pub ai: AiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
