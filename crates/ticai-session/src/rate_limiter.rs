//! Rolling request window and its background reset tick.
//!
//! The limiter itself is plain data driven by timestamps from a [`Clock`].
//! [`WindowTicker`] runs the periodic expiry check so a window resets even
//! when nobody sends.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::SessionError;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Counts completed requests in a fixed-length window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window_start: Instant,
    count: u32,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
            limit,
            window,
        }
    }

    /// Start a new window if the current one has run its full length.
    /// Returns whether a reset happened.
    pub fn refresh(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.window_start) >= self.window {
            if self.count > 0 {
                debug!(count = self.count, "rate window reset");
            }
            self.window_start = now;
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Ok while the window has requests left.
    pub fn check(&mut self, now: Instant) -> Result<(), SessionError> {
        self.refresh(now);
        if self.count >= self.limit {
            let elapsed = now.saturating_duration_since(self.window_start);
            return Err(SessionError::RateLimited {
                retry_after: self.window.saturating_sub(elapsed),
            });
        }
        Ok(())
    }

    /// Count one completed request.
    pub fn record(&mut self, now: Instant) {
        self.refresh(now);
        self.count = self.count.saturating_add(1);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }
}

/// Periodic task calling `on_tick` until cancelled, dropped, or `on_tick`
/// returns false.
pub struct WindowTicker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl WindowTicker {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if !on_tick() {
                            break;
                        }
                    }
                }
            }
            debug!("rate window ticker stopped");
        });

        Self { cancel, handle }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for WindowTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
