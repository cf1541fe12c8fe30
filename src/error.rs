//! Sleipnir error types

/// Sleipnir error types
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    // Per-attempt failures (recovered by the executors, never surfaced)
    #[error("attempt exceeded its timeout budget")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend rejected request ({status}): {message}")]
    BackendRejected { status: u16, message: String },

    #[error("empty response from backend")]
    EmptyResponse,

    // Stage-level failure: every candidate in a stage failed
    #[error("all candidates exhausted")]
    AllCandidatesExhausted,

    // Request validation errors (surfaced synchronously)
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DispatchError {
    /// Whether this error is a per-attempt failure the executors recover
    /// from by advancing to the next candidate or escalation stage.
    ///
    /// Validation and configuration errors are not attempt failures and
    /// stop the dispatch immediately.
    pub fn is_attempt_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::Timeout
                | DispatchError::Transport(_)
                | DispatchError::BackendRejected { .. }
                | DispatchError::EmptyResponse
        )
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else if err.is_decode() {
            DispatchError::Transport(format!("malformed payload: {err}"))
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}

/// Result type alias for Sleipnir operations
pub type Result<T> = std::result::Result<T, DispatchError>;
