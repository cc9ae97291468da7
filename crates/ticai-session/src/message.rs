//! Conversation messages and prompt assembly.

use serde::{Deserialize, Serialize};

/// Reply appended when the completion service fails.
pub const FALLBACK_TEXT: &str = "Sorry, I could not process your request at the moment.";

/// A single chat message.
///
/// `id` equals the message count at the time the message was appended, so
/// ids within a conversation are always `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sent_by_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl Message {
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sent_by_user: true,
            mode: None,
        }
    }

    pub fn assistant(id: u64, text: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sent_by_user: false,
            mode: Some(mode.into()),
        }
    }
}

/// Truncate to at most `max_chars` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Prior message texts, one per line, followed by the new user turn.
pub(crate) fn build_prompt(history: &[Message], text: &str) -> String {
    let mut prompt = history
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if !prompt.is_empty() {
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(text);
    prompt
}

/// True when ids run `0, 1, 2, ...` in order.
pub(crate) fn ids_are_contiguous(messages: &[Message]) -> bool {
    messages
        .iter()
        .enumerate()
        .all(|(index, message)| message.id == index as u64)
}
