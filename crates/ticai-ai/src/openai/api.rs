//! AiGateway trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiGateway, CompletionError};

use super::client::OpenAiClient;

#[async_trait]
impl AiGateway for OpenAiClient {
    async fn complete(&self, prompt: &str, mode: &str) -> Result<String, CompletionError> {
        let body = self.build_request_body(prompt, mode);

        debug!(model = %self.config.model, mode, "OpenAI API request");

        let response = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(CompletionError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        self.parse_response(&json)
    }
}
