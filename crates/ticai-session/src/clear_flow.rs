//! Confirmation state machine guarding a destructive chat clear.
//!
//! `Idle --request--> PendingConfirm --confirm--> Idle` (messages wiped by
//! the caller) or `PendingConfirm --cancel--> Idle` (snapshot handed back).

use crate::error::SessionError;
use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    Idle,
    PendingConfirm,
}

#[derive(Debug, Clone, Default)]
pub struct ClearFlow {
    snapshot: Option<Vec<Message>>,
}

impl ClearFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClearState {
        if self.snapshot.is_some() {
            ClearState::PendingConfirm
        } else {
            ClearState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Enter `PendingConfirm`, snapshotting `messages`. Requesting again
    /// replaces the snapshot.
    pub fn request(&mut self, messages: &[Message]) {
        self.snapshot = Some(messages.to_vec());
    }

    /// Keep a message appended while pending, so cancelling does not drop it.
    pub fn record_append(&mut self, message: &Message) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.push(message.clone());
        }
    }

    /// Leave `PendingConfirm`, discarding the snapshot.
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or(SessionError::NoClearPending)
    }

    /// Leave `PendingConfirm`, returning the snapshot to restore.
    pub fn cancel(&mut self) -> Result<Vec<Message>, SessionError> {
        self.snapshot.take().ok_or(SessionError::NoClearPending)
    }
}
