//! Request rate-limit configuration.

use serde::{Deserialize, Serialize};

/// Rolling window bounding the number of AI requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Completed requests allowed per window (valid range: 1-1000).
    pub limit: u32,
    /// Window length in seconds (valid range: 1-86400).
    pub window_seconds: u32,
    /// How often the background tick checks for window expiry, in ms (valid range: 10-60000).
    pub tick_millis: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            window_seconds: 60,
            tick_millis: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.limit, 10);
        assert_eq!(config.window_seconds, 60);
        assert_eq!(config.tick_millis, 1000);
    }
}
