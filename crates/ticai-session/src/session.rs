//! Session state owned by the controller.

use std::time::{Duration, Instant};

use ticai_config::TicaiConfig;

use crate::clear_flow::{ClearFlow, ClearState};
use crate::message::Message;
use crate::modes::DEFAULT_MODE;
use crate::rate_limiter::RateLimiter;

/// Conversation caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_messages: usize,
    pub max_message_chars: usize,
    pub conversation_started_at: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_messages: 100,
            max_message_chars: 250,
            conversation_started_at: 6,
        }
    }
}

/// Everything the controller needs from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub limits: Limits,
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub tick_period: Duration,
    pub request_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            rate_limit: 10,
            rate_window: Duration::from_secs(60),
            tick_period: Duration::from_secs(1),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &TicaiConfig) -> Self {
        Self {
            limits: Limits {
                max_messages: config.limits.max_messages as usize,
                max_message_chars: config.limits.max_message_chars as usize,
                conversation_started_at: config.limits.conversation_started_at as usize,
            },
            rate_limit: config.rate_limit.limit,
            rate_window: Duration::from_secs(u64::from(config.rate_limit.window_seconds)),
            tick_period: Duration::from_millis(u64::from(config.rate_limit.tick_millis)),
            request_timeout: Duration::from_secs(u64::from(config.ai.timeout_secs)),
        }
    }
}

/// Full state of one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) messages: Vec<Message>,
    pub(crate) mode: String,
    pub(crate) conversation_started: bool,
    pub(crate) draft: String,
    pub(crate) loading: bool,
    pub(crate) clear: ClearFlow,
    pub(crate) rate: RateLimiter,
    pub(crate) limits: Limits,
    pub(crate) ai_details: Option<serde_json::Value>,
}

impl Session {
    pub fn new(settings: &SessionSettings, now: Instant) -> Self {
        Self {
            messages: Vec::new(),
            mode: DEFAULT_MODE.to_string(),
            conversation_started: false,
            draft: String::new(),
            loading: false,
            clear: ClearFlow::new(),
            rate: RateLimiter::new(settings.rate_limit, settings.rate_window, now),
            limits: settings.limits,
            ai_details: None,
        }
    }

    /// Seed from persisted state. Callers validate `messages` and `mode` first.
    pub(crate) fn restore(
        &mut self,
        messages: Vec<Message>,
        mode: String,
        ai_details: Option<serde_json::Value>,
    ) {
        self.conversation_started = messages.len() >= self.limits.conversation_started_at;
        self.messages = messages;
        self.mode = mode;
        self.ai_details = ai_details;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn conversation_started(&self) -> bool {
        self.conversation_started
    }

    pub fn request_count(&self) -> u32 {
        self.rate.count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// No room left for another exchange (user message plus reply).
    pub fn at_capacity(&self) -> bool {
        self.messages.len() + 2 > self.limits.max_messages
    }

    /// The "start a new topic" prompt should be shown.
    pub fn needs_new_topic(&self) -> bool {
        self.conversation_started && self.at_capacity()
    }

    /// Append with the next id, keeping the clear snapshot and the
    /// started flag in step.
    pub(crate) fn append(&mut self, mut message: Message) -> u64 {
        let id = self.messages.len() as u64;
        message.id = id;
        self.clear.record_append(&message);
        self.messages.push(message);
        if !self.conversation_started
            && self.messages.len() >= self.limits.conversation_started_at
        {
            self.conversation_started = true;
        }
        id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            mode: self.mode.clone(),
            conversation_started: self.conversation_started,
            request_count: self.rate.count(),
            rate_limited: self.rate.is_exhausted(),
            loading: self.loading,
            draft: self.draft.clone(),
            clear_state: self.clear.state(),
            needs_new_topic: self.needs_new_topic(),
        }
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub mode: String,
    pub conversation_started: bool,
    pub request_count: u32,
    pub rate_limited: bool,
    pub loading: bool,
    pub draft: String,
    pub clear_state: ClearState,
    pub needs_new_topic: bool,
}
