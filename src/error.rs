use crate::types::Username;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Typed failure conditions surfaced to the caller.
///
/// The engine never retries on its own; the presentation layer decides
/// what to do with each condition. Only `StoreUnavailable` is worth
/// retrying from the outside.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} has locked in their vote")]
    Locked(Username),

    #[error("room is not open")]
    RoomClosed,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EngineError {
    /// Whether a caller could reasonably retry the same call
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StoreUnavailable(_))
    }
}
