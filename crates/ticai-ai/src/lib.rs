//! Completion gateway for TicAI.
//!
//! Defines the `AiGateway` port the session controller talks to and an
//! OpenAI-compatible chat completions client implementing it.

pub mod openai;

use async_trait::async_trait;

pub use openai::{OpenAiClient, OpenAiConfig};

/// Sends a prompt plus an answer mode to a completion service.
///
/// Responses are all-or-nothing: either the full text or an error.
/// Implementations do not retry.
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn complete(&self, prompt: &str, mode: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Empty response")]
    EmptyResponse,
    #[error("Timeout")]
    Timeout,
}
