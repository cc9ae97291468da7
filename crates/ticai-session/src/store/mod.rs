//! Key-value persistence port and its implementations.
//!
//! The controller is the only caller. Messages and the selected mode are
//! stored under separate keys; `aiDetails` is read once and never written.

mod file;
mod memory;
mod queue;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use queue::PersistQueue;

use async_trait::async_trait;
use ticai_common::PersistenceError;
use tracing::warn;

use crate::message::{ids_are_contiguous, Message};
use crate::modes::{ModeRegistry, DEFAULT_MODE};

pub const MESSAGES_KEY: &str = "messages";
pub const SELECTED_MODE_KEY: &str = "selectedMode";
pub const AI_DETAILS_KEY: &str = "aiDetails";

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// State recovered at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub messages: Vec<Message>,
    pub mode: String,
    pub ai_details: Option<serde_json::Value>,
}

/// Read all persisted keys. Anything missing, unreadable, or corrupt
/// falls back to a fresh value.
pub async fn load_session(
    store: &dyn KvStore,
    registry: &ModeRegistry,
    max_messages: usize,
) -> StoredSession {
    let messages = read_key(store, MESSAGES_KEY)
        .await
        .and_then(|raw| match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) => Some(messages),
            Err(e) => {
                warn!("stored messages are corrupt, starting fresh: {e}");
                None
            }
        })
        .filter(|messages| {
            let valid = messages.len() <= max_messages && ids_are_contiguous(messages);
            if !valid {
                warn!(
                    count = messages.len(),
                    "stored messages break id or size invariants, starting fresh"
                );
            }
            valid
        })
        .unwrap_or_default();

    let mode = read_key(store, SELECTED_MODE_KEY)
        .await
        .filter(|mode| {
            let selectable = registry.is_selectable(mode);
            if !selectable {
                warn!(mode = %mode, "stored mode is not available, using default");
            }
            selectable
        })
        .unwrap_or_else(|| DEFAULT_MODE.to_string());

    let ai_details = read_key(store, AI_DETAILS_KEY)
        .await
        .and_then(|raw| match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("stored aiDetails are corrupt, ignoring: {e}");
                None
            }
        });

    StoredSession {
        messages,
        mode,
        ai_details,
    }
}

async fn read_key(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("failed to load '{key}' from storage: {e}");
            None
        }
    }
}
