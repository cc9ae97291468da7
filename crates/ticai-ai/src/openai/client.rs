//! OpenAI client struct, request building, and response parsing.

use std::time::Duration;

use crate::CompletionError;

use super::config::OpenAiConfig;

/// OpenAI chat completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CompletionError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Build the JSON request body for the chat completions API.
    pub(crate) fn build_request_body(&self, prompt: &str, mode: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": self.config.instruction_for(mode) },
                { "role": "user", "content": prompt },
            ],
        })
    }

    /// Extract the first choice's text. Anything short of a complete,
    /// non-empty answer is an error.
    pub(crate) fn parse_response(&self, json: &serde_json::Value) -> Result<String, CompletionError> {
        let choice = json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or_else(|| CompletionError::ParseError("response has no choices".into()))?;

        if choice["finish_reason"] == "length" {
            return Err(CompletionError::ApiError("response truncated".into()));
        }

        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| CompletionError::ParseError("choice has no text content".into()))?
            .trim();

        if content.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}
