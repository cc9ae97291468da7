//! Pure state transitions.
//!
//! `reduce` applies one [`Action`] to a [`Session`] and returns the
//! [`Effect`]s the controller must execute. Nothing here performs I/O.

use std::time::Instant;

use ticai_ai::CompletionError;
use ticai_common::Event;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::message::{build_prompt, truncate_chars, Message, FALLBACK_TEXT};
use crate::modes::ModeRegistry;
use crate::session::Session;

#[derive(Debug, Clone)]
pub enum Action {
    UpdateDraft(String),
    Send(String),
    CompletionResolved {
        /// Mode active when the request was sent.
        mode: String,
        result: Result<String, CompletionError>,
    },
    SelectMode(String),
    RequestClear,
    ConfirmClear,
    CancelClear,
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SaveMessages(Vec<Message>),
    SaveMode(String),
    RemoveMessages,
    Complete { prompt: String, mode: String },
    Notify(Event),
}

pub fn reduce(
    session: &mut Session,
    registry: &ModeRegistry,
    action: Action,
    now: Instant,
) -> Result<Vec<Effect>, SessionError> {
    match action {
        Action::UpdateDraft(text) => {
            session.draft = truncate_chars(&text, session.limits.max_message_chars);
            Ok(Vec::new())
        }
        Action::Send(text) => send(session, text, now),
        Action::CompletionResolved { mode, result } => {
            Ok(resolve_completion(session, mode, result, now))
        }
        Action::SelectMode(key) => {
            let Some(definition) = registry.select(&key) else {
                debug!(mode = %key, "ignoring unavailable mode");
                return Err(SessionError::ModeUnavailable(key));
            };
            session.mode = definition.key.clone();
            Ok(vec![
                Effect::SaveMode(session.mode.clone()),
                Effect::Notify(Event::ModeChanged(session.mode.clone())),
            ])
        }
        Action::RequestClear => {
            session.clear.request(&session.messages);
            Ok(vec![Effect::Notify(Event::ClearRequested)])
        }
        Action::ConfirmClear => {
            session.clear.confirm()?;
            session.messages.clear();
            session.conversation_started = false;
            Ok(vec![Effect::RemoveMessages, Effect::Notify(Event::Cleared)])
        }
        Action::CancelClear => {
            let snapshot = session.clear.cancel()?;
            let mut effects = Vec::new();
            if snapshot != session.messages {
                session.messages = snapshot;
                effects.push(Effect::SaveMessages(session.messages.clone()));
            }
            effects.push(Effect::Notify(Event::ClearCancelled));
            Ok(effects)
        }
        Action::Tick => {
            let was_exhausted = session.rate.is_exhausted();
            if session.rate.refresh(now) && was_exhausted {
                Ok(vec![Effect::Notify(Event::RateWindowReset)])
            } else {
                Ok(Vec::new())
            }
        }
    }
}

fn send(session: &mut Session, text: String, now: Instant) -> Result<Vec<Effect>, SessionError> {
    let text = truncate_chars(&text, session.limits.max_message_chars);
    if text.trim().is_empty() {
        return Err(SessionError::EmptyInput);
    }
    if session.loading {
        return Err(SessionError::Busy);
    }
    if session.clear.is_pending() {
        return Err(SessionError::ClearPending);
    }
    if session.at_capacity() {
        return Err(SessionError::CapacityExceeded {
            max: session.limits.max_messages,
        });
    }
    session.rate.check(now)?;

    let prompt = build_prompt(&session.messages, &text);
    let id = session.append(Message::user(0, text));
    session.draft.clear();
    session.loading = true;

    Ok(vec![
        Effect::Notify(Event::MessageAppended {
            id,
            sent_by_user: true,
        }),
        Effect::Notify(Event::LoadingChanged(true)),
        Effect::SaveMessages(session.messages.clone()),
        Effect::Complete {
            prompt,
            mode: session.mode.clone(),
        },
    ])
}

fn resolve_completion(
    session: &mut Session,
    mode: String,
    result: Result<String, CompletionError>,
    now: Instant,
) -> Vec<Effect> {
    session.loading = false;
    let mut effects = vec![Effect::Notify(Event::LoadingChanged(false))];

    let text = match result {
        Ok(text) => {
            session.rate.record(now);
            text
        }
        Err(e) => {
            warn!("completion failed, using fallback reply: {e}");
            FALLBACK_TEXT.to_string()
        }
    };

    if session.messages.len() >= session.limits.max_messages {
        warn!("conversation full, dropping reply");
        return effects;
    }

    let id = session.append(Message::assistant(0, text, mode));
    effects.push(Effect::Notify(Event::MessageAppended {
        id,
        sent_by_user: false,
    }));
    effects.push(Effect::SaveMessages(session.messages.clone()));
    effects
}

#[cfg(test)]
mod tests;
