//! Session controller: runs reducer effects against the outside world.
//!
//! State lives behind a `std::sync::Mutex` that is only held for a
//! reducer step and the synchronous effects it produces. Completion
//! requests run with the lock released.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use ticai_ai::{AiGateway, CompletionError};
use ticai_common::{Event, EventBus};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::message::Message;
use crate::modes::ModeRegistry;
use crate::rate_limiter::{Clock, WindowTicker};
use crate::reducer::{reduce, Action, Effect};
use crate::session::{Session, SessionSettings, SessionSnapshot};
use crate::store::{load_session, KvStore, PersistQueue};

/// Handle to one conversation. Cheap to clone.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    session: Mutex<Session>,
    registry: ModeRegistry,
    gateway: Arc<dyn AiGateway>,
    clock: Arc<dyn Clock>,
    persist: PersistQueue,
    events: EventBus,
    request_timeout: Duration,
    ticker: Mutex<Option<WindowTicker>>,
}

/// A completion the reducer asked for.
struct CompletionRequest {
    prompt: String,
    mode: String,
}

impl SessionController {
    /// Load persisted state, then start the persistence worker and the
    /// rate window ticker. Must be called inside a tokio runtime.
    pub async fn start(
        settings: SessionSettings,
        registry: ModeRegistry,
        gateway: Arc<dyn AiGateway>,
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        let stored = load_session(store.as_ref(), &registry, settings.limits.max_messages).await;
        let mut session = Session::new(&settings, clock.now());
        info!(
            messages = stored.messages.len(),
            mode = %stored.mode,
            "session restored"
        );
        session.restore(stored.messages, stored.mode, stored.ai_details);

        let inner = Arc::new(Inner {
            session: Mutex::new(session),
            registry,
            gateway,
            clock,
            persist: PersistQueue::spawn(store, events.clone()),
            events,
            request_timeout: settings.request_timeout,
            ticker: Mutex::new(None),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let ticker = WindowTicker::spawn(settings.tick_period, move || match weak.upgrade() {
            Some(inner) => {
                if let Err(e) = inner.dispatch(Action::Tick) {
                    warn!("rate window tick failed: {e}");
                }
                true
            }
            None => false,
        });
        *lock(&inner.ticker) = Some(ticker);

        Self { inner }
    }

    /// Append `text` as a user message and wait for the reply.
    ///
    /// Policy rejections return an error and leave the session untouched.
    /// Completion failures are not errors: they produce the fallback reply.
    pub async fn send_message(&self, text: &str) -> Result<(), SessionError> {
        let Some(request) = self.inner.dispatch(Action::Send(text.to_string()))? else {
            return Ok(());
        };

        let in_flight = InFlight::new(&self.inner, request.mode.clone());
        let result = match tokio::time::timeout(
            self.inner.request_timeout,
            self.inner.gateway.complete(&request.prompt, &request.mode),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout),
        };
        in_flight.resolve(result);
        Ok(())
    }

    pub fn update_draft(&self, text: &str) {
        if let Err(e) = self.inner.dispatch(Action::UpdateDraft(text.to_string())) {
            debug!("draft update rejected: {e}");
        }
    }

    pub fn select_mode(&self, key: &str) -> Result<(), SessionError> {
        self.inner.dispatch(Action::SelectMode(key.to_string())).map(|_| ())
    }

    pub fn request_clear(&self) {
        if let Err(e) = self.inner.dispatch(Action::RequestClear) {
            debug!("clear request rejected: {e}");
        }
    }

    pub fn confirm_clear(&self) -> Result<(), SessionError> {
        self.inner.dispatch(Action::ConfirmClear).map(|_| ())
    }

    pub fn cancel_clear(&self) -> Result<(), SessionError> {
        self.inner.dispatch(Action::CancelClear).map(|_| ())
    }

    /// Run the rate window expiry check now.
    pub fn tick(&self) {
        if let Err(e) = self.inner.dispatch(Action::Tick) {
            warn!("rate window tick failed: {e}");
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.inner.session).snapshot()
    }

    pub fn messages(&self) -> Vec<Message> {
        lock(&self.inner.session).messages().to_vec()
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.inner.registry
    }

    /// The opaque `aiDetails` blob found in storage at start, if any.
    pub fn ai_details(&self) -> Option<serde_json::Value> {
        lock(&self.inner.session).ai_details.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Wait for queued persistence writes to land.
    pub async fn flush(&self) {
        self.inner.persist.flush().await;
    }

    /// Stop the ticker and drain pending writes.
    pub async fn shutdown(&self) {
        if let Some(ticker) = lock(&self.inner.ticker).take() {
            ticker.cancel();
        }
        self.inner.persist.flush().await;
        self.inner.events.publish(Event::Shutdown);
        info!("session shut down");
    }
}

impl Inner {
    /// Apply `action` and run its effects while the state lock is held, so
    /// persistence writes are queued in reducer order.
    fn dispatch(&self, action: Action) -> Result<Option<CompletionRequest>, SessionError> {
        let now = self.clock.now();
        let mut session = lock(&self.session);
        let effects = reduce(&mut session, &self.registry, action, now)?;

        let mut request = None;
        for effect in effects {
            match effect {
                Effect::SaveMessages(messages) => self.persist.save_messages(&messages),
                Effect::SaveMode(mode) => self.persist.save_mode(&mode),
                Effect::RemoveMessages => self.persist.remove_messages(),
                Effect::Notify(event) => {
                    self.events.publish(event);
                }
                Effect::Complete { prompt, mode } => {
                    request = Some(CompletionRequest { prompt, mode });
                }
            }
        }
        Ok(request)
    }
}

/// Resolves an outstanding completion exactly once. If the sending future
/// is dropped before a result arrives, the request resolves as failed so
/// the session never stays loading.
struct InFlight<'a> {
    inner: &'a Inner,
    mode: Option<String>,
}

impl<'a> InFlight<'a> {
    fn new(inner: &'a Inner, mode: String) -> Self {
        Self {
            inner,
            mode: Some(mode),
        }
    }

    fn resolve(mut self, result: Result<String, CompletionError>) {
        if let Some(mode) = self.mode.take() {
            self.finish(mode, result);
        }
    }

    fn finish(&self, mode: String, result: Result<String, CompletionError>) {
        if let Err(e) = self
            .inner
            .dispatch(Action::CompletionResolved { mode, result })
        {
            warn!("failed to record completion: {e}");
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(mode) = self.mode.take() {
            debug!("completion request abandoned");
            self.finish(
                mode,
                Err(CompletionError::NetworkError("request cancelled".into())),
            );
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
