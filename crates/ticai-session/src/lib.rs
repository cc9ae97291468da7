//! Conversation session controller for TicAI.
//!
//! Owns the conversation state and enforces its policies:
//! - Message cap and contiguous message ids
//! - Rolling request window with a background reset tick
//! - Answer mode selection against a fixed catalog
//! - Confirmed chat clearing with undo
//!
//! State transitions are pure (`reducer::reduce`); the `SessionController`
//! executes the resulting effects (gateway calls, persistence, events).

pub mod clear_flow;
pub mod controller;
pub mod error;
pub mod message;
pub mod modes;
pub mod rate_limiter;
pub mod reducer;
pub mod session;
pub mod store;

pub use clear_flow::{ClearFlow, ClearState};
pub use controller::SessionController;
pub use error::SessionError;
pub use message::{Message, FALLBACK_TEXT};
pub use modes::{ModeDefinition, ModeRegistry, ModeSection, DEFAULT_MODE};
pub use rate_limiter::{Clock, ManualClock, RateLimiter, SystemClock, WindowTicker};
pub use reducer::{Action, Effect};
pub use session::{Limits, Session, SessionSettings, SessionSnapshot};
pub use store::{FileStore, KvStore, MemoryStore, PersistQueue};
