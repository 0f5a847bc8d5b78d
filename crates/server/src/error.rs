use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur when running the Session bridge server or CLI.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener or reading a batch file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request body could not be parsed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<toml::de::Error> for ServerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_payload_is_bad_request() {
        let response = ServerError::InvalidPayload("expected value".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_and_io_errors_are_internal() {
        let response = ServerError::Config("bad path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        assert_eq!(
            ServerError::from(io).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn toml_errors_become_config_errors() {
        let err: ServerError = toml::from_str::<toml::Value>("server = [").unwrap_err().into();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
