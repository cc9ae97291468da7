//! Conversation limit configuration.

use serde::{Deserialize, Serialize};

/// Caps applied to a single conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of messages kept in a conversation (valid range: 2-1000).
    pub max_messages: u32,
    /// Maximum characters in a user message (valid range: 1-4000).
    pub max_message_chars: u32,
    /// Message count at which the conversation counts as started (valid range: 1-100).
    pub conversation_started_at: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_messages: 100,
            max_message_chars: 250,
            conversation_started_at: 6,
        }
    }
}
