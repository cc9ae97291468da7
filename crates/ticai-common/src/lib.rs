pub mod errors;
pub mod events;

pub use errors::{ConfigError, PersistenceError, TicaiError};
pub use events::{Event, EventBus};

pub type Result<T> = std::result::Result<T, TicaiError>;
