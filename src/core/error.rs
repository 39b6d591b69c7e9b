// Error taxonomy for the engine and its collaborators.
//
// Only validation failures ever reach engine callers. Storage and channel
// failures are retried or logged and swallowed so a flaky collaborator can
// never crash the host app.

/// Errors returned to engine callers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A crossing event arrived with unusable arguments.
    #[error("invalid parameters provided to handle_safe_zone_event")]
    InvalidParameters,

    /// A settings update failed validation; prior settings are untouched.
    #[error("invalid settings update: {0}")]
    Validation(String),
}

/// Failure reported by a key-value store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a notification channel or reward ledger.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel unavailable: {0}")]
    Unavailable(String),
}
