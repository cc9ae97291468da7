use tokio::sync::broadcast;

/// Session notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MessageAppended { id: u64, sent_by_user: bool },
    LoadingChanged(bool),
    ModeChanged(String),
    ClearRequested,
    ClearCancelled,
    Cleared,
    RateWindowReset,
    PersistenceFailed(String),
    Shutdown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
