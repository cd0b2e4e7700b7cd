use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No session, or a session without a refresh token. The caller must
    /// re-authenticate; nothing is retried.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The coalesced token refresh failed. The session has been cleared.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure. `retryable` is set only for idempotent GETs.
    #[error("Network error{}", if *.retryable { " (retry may succeed)" } else { "" })]
    Network {
        retryable: bool,
        #[source]
        source: reqwest::Error,
    },

    #[error("Client state storage error")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Network { retryable: true, .. })
    }
}
