use session_bridge_provider::DispatchError;
use thiserror::Error;

/// Errors specific to the Session client.
///
/// These are internal errors that get converted into [`DispatchError`] at the
/// transport boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the API key (HTTP 401 or 403).
    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The server returned a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl From<SessionError> for DispatchError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Http(e) => {
                if e.is_timeout() {
                    DispatchError::Network(format!("request timed out: {e}"))
                } else {
                    DispatchError::Network(e.to_string())
                }
            }
            SessionError::Unauthorized { status, body } => {
                DispatchError::AuthenticationFailure(format!("HTTP {status}: {body}"))
            }
            SessionError::UnexpectedStatus { status, body } => {
                DispatchError::Remote { status, body }
            }
        }
    }
}
