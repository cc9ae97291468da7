//! Ordered background persistence.
//!
//! Writes are queued on an unbounded channel and applied one at a time by
//! a worker task, so they land in the order the session produced them.
//! Failures are logged and published; they never reach the caller.

use std::sync::Arc;

use ticai_common::{Event, EventBus};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use super::{KvStore, MESSAGES_KEY, SELECTED_MODE_KEY};
use crate::message::Message;

enum StoreOp {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
    Flush(oneshot::Sender<()>),
}

pub struct PersistQueue {
    tx: mpsc::UnboundedSender<StoreOp>,
}

impl PersistQueue {
    pub fn spawn(store: Arc<dyn KvStore>, events: EventBus) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoreOp>();

        tokio::spawn(async move {
            while let Some(op) = rx.recv().await {
                let (key, result) = match op {
                    StoreOp::Set { key, value } => (key, store.set(key, &value).await),
                    StoreOp::Remove { key } => (key, store.remove(key).await),
                    StoreOp::Flush(done) => {
                        let _ = done.send(());
                        continue;
                    }
                };
                match result {
                    Ok(()) => debug!(key, "persisted"),
                    Err(e) => {
                        error!("failed to persist '{key}': {e}");
                        events.publish(Event::PersistenceFailed(e.to_string()));
                    }
                }
            }
            debug!("persistence worker stopped");
        });

        Self { tx }
    }

    pub fn save_messages(&self, messages: &[Message]) {
        match serde_json::to_string(messages) {
            Ok(value) => self.enqueue(StoreOp::Set {
                key: MESSAGES_KEY,
                value,
            }),
            Err(e) => error!("failed to serialize messages: {e}"),
        }
    }

    pub fn save_mode(&self, mode: &str) {
        self.enqueue(StoreOp::Set {
            key: SELECTED_MODE_KEY,
            value: mode.to_string(),
        });
    }

    pub fn remove_messages(&self) {
        self.enqueue(StoreOp::Remove { key: MESSAGES_KEY });
    }

    /// Wait until every write queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.enqueue(StoreOp::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn enqueue(&self, op: StoreOp) {
        if self.tx.send(op).is_err() {
            error!("persistence worker is gone, dropping write");
        }
    }
}
