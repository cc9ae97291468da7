//! OpenAI chat completions client.
//!
//! Implements `AiGateway` against any endpoint speaking the
//! `/chat/completions` protocol. The answer mode is turned into a system
//! instruction; the prompt is sent as a single user turn.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
