use std::time::Duration;

/// Local policy rejections returned to the caller.
///
/// Completion and persistence failures never surface here: the former
/// becomes a fallback message, the latter is logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,

    #[error("conversation is full ({max} messages), clear it to continue")]
    CapacityExceeded { max: usize },

    #[error("request limit reached, retry in {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("a request is already in flight")]
    Busy,

    #[error("a clear is waiting for confirmation")]
    ClearPending,

    #[error("no clear is waiting for confirmation")]
    NoClearPending,

    #[error("mode '{0}' is not available")]
    ModeUnavailable(String),
}
