use session_bridge_core::{ErrorKind, OperationError};
use thiserror::Error;

/// Errors that can occur while dispatching an operation.
///
/// Each variant maps onto exactly one [`ErrorKind`]; the kind is what ends up
/// in an isolated item's failure record.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The referenced binary property is absent from the input item.
    #[error("no binary data found on property '{property}'")]
    MissingBinaryData { property: String },

    /// The operation name is not one of the known operations.
    #[error("the operation '{0}' is not supported")]
    UnsupportedOperation(String),

    /// The operation parameters are missing a field or carry a bad value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The remote service rejected the configured API key.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// A network or transport-level error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with a non-2xx status.
    #[error("remote error: HTTP {status}: {body}")]
    Remote { status: u16, body: String },
}

impl DispatchError {
    /// The failure classification recorded on isolated items.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBinaryData { .. } => ErrorKind::MissingBinaryData,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::AuthenticationFailure(_) => ErrorKind::AuthenticationFailure,
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Remote { .. } => ErrorKind::RemoteError,
        }
    }

    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry. The dispatcher itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<OperationError> for DispatchError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Unsupported(name) => Self::UnsupportedOperation(name),
            other @ (OperationError::MissingOperation
            | OperationError::InvalidParameters { .. }) => Self::InvalidRequest(other.to_string()),
        }
    }
}
