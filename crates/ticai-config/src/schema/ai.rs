//! Completion service configuration.

use serde::{Deserialize, Serialize};

/// Completion service endpoint and request parameters.
///
/// The API key is never stored here; it is read from `OPENAI_API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    /// Valid range: 16-8192.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    /// Per-request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}
