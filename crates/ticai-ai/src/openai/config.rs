//! OpenAI client configuration.

use std::collections::HashMap;
use std::fmt;

use crate::CompletionError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI client configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// System instruction per mode key. Unknown modes get a generic instruction.
    pub mode_instructions: HashMap<String, String>,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("modes", &self.mode_instructions.len())
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            temperature: 0.7,
            mode_instructions: HashMap::new(),
        }
    }

    /// Create config from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, CompletionError> {
        let key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CompletionError::ApiError("OpenAI API not configured. Set OPENAI_API_KEY.".into())
        })?;
        if key.trim().is_empty() {
            return Err(CompletionError::ApiError("OPENAI_API_KEY is empty".into()));
        }
        Ok(Self::new(key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_mode_instructions(mut self, instructions: HashMap<String, String>) -> Self {
        self.mode_instructions = instructions;
        self
    }

    /// System instruction for `mode`.
    pub(crate) fn instruction_for(&self, mode: &str) -> String {
        self.mode_instructions
            .get(mode)
            .cloned()
            .unwrap_or_else(|| format!("Answer in the \"{mode}\" style."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = OpenAiConfig::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = OpenAiConfig::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn instruction_falls_back_for_unknown_mode() {
        let mut modes = HashMap::new();
        modes.insert("short".to_string(), "Answer in one sentence.".to_string());
        let config = OpenAiConfig::new("k").with_mode_instructions(modes);

        assert_eq!(config.instruction_for("short"), "Answer in one sentence.");
        assert!(config.instruction_for("pirate").contains("pirate"));
    }
}
