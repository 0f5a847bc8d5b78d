use serde::{Deserialize, Serialize};

/// Classification of a per-item dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The referenced binary property is absent from the input item.
    MissingBinaryData,
    /// The operation name is not one of the known operations.
    UnsupportedOperation,
    /// A required operation parameter is missing or malformed.
    InvalidRequest,
    /// The remote service rejected the API key.
    AuthenticationFailure,
    /// The request never produced an HTTP response (connect, TLS, timeout).
    NetworkFailure,
    /// The remote service answered with a non-2xx status.
    RemoteError,
}

impl ErrorKind {
    /// Returns the kind name as used in serialized results.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingBinaryData => "MissingBinaryData",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::InvalidRequest => "InvalidRequest",
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::NetworkFailure => "NetworkFailure",
            Self::RemoteError => "RemoteError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to a failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub kind: ErrorKind,
    pub message: String,
    /// The failure is transient and the item may succeed if sent again.
    #[serde(default)]
    pub retryable: bool,
}

/// Outcome of dispatching one input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchResult {
    /// The remote service answered with a 2xx status.
    Success {
        /// Parsed response body.
        json: serde_json::Value,
    },
    /// The item failed and isolation was enabled.
    Failure {
        /// The original input item's JSON, unchanged.
        json: serde_json::Value,
        /// What went wrong.
        error: DispatchFailure,
    },
}

impl DispatchResult {
    /// Create a successful result.
    #[must_use]
    pub fn success(json: serde_json::Value) -> Self {
        Self::Success { json }
    }

    /// Create a failed result echoing the original input.
    #[must_use]
    pub fn failure(input: serde_json::Value, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            json: input,
            error: DispatchFailure {
                kind,
                message: message.into(),
                retryable: false,
            },
        }
    }

    /// Mark a failed result as transient. No effect on a success.
    #[must_use]
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        if let Self::Failure { error, .. } = &mut self {
            error.retryable = retryable;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The JSON carried by this result: the response on success, the input
    /// echo on failure.
    pub fn json(&self) -> &serde_json::Value {
        match self {
            Self::Success { json } | Self::Failure { json, .. } => json,
        }
    }

    /// The failure kind, if this result is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error.kind),
        }
    }
}
