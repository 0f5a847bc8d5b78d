use reqwest::Client;
use session_bridge_core::{HttpCommand, HttpMethod};
use session_bridge_provider::{DispatchError, Transport};
use tracing::{debug, instrument, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated HTTP client for the Session Webhook Server.
///
/// Implements [`Transport`]: every command is sent to
/// `{base_url}{command.path}` with the `X-API-Key` header attached.
pub struct SessionClient {
    config: SessionConfig,
    client: Client,
}

impl SessionClient {
    /// Create a new client with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with the configured timeout.
    pub fn new(config: SessionConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    /// Create a new client with a custom HTTP client.
    pub fn with_client(config: SessionConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn build_request(&self, command: &HttpCommand) -> reqwest::RequestBuilder {
        let url = command.url(&self.config.base_url);
        let mut request = match command.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (key, value) in &command.headers {
            request = request.header(key, value);
        }
        request = request.header(API_KEY_HEADER, &self.config.api_key);

        if let Some(body) = &command.body {
            request = request.json(body);
        }

        session_bridge_provider::inject_trace_context(request)
    }

    /// Turn an HTTP response into the JSON body or a [`SessionError`].
    ///
    /// Successful bodies are parsed best-effort: an empty body becomes `{}`
    /// and a non-JSON body is wrapped as `{"status_code", "body"}`.
    async fn interpret_response(
        response: reqwest::Response,
    ) -> Result<serde_json::Value, SessionError> {
        let status = response.status();
        let status_code = status.as_u16();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status_code, "Session server rejected the API key");
            return Err(SessionError::Unauthorized {
                status: status_code,
                body,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::UnexpectedStatus {
                status: status_code,
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::json!({}));
        }

        Ok(serde_json::from_str(&text).unwrap_or_else(|_| {
            serde_json::json!({
                "status_code": status_code,
                "body": text,
            })
        }))
    }
}

impl Transport for SessionClient {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "session"
    }

    #[instrument(skip(self, command), fields(method = %command.method, path = command.path))]
    async fn send(&self, command: &HttpCommand) -> Result<serde_json::Value, DispatchError> {
        debug!("sending command to Session server");

        let response = self
            .build_request(command)
            .send()
            .await
            .map_err(SessionError::Http)?;

        Ok(Self::interpret_response(response).await?)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), DispatchError> {
        debug!(base_url = %self.config.base_url, "performing Session health check");

        let response = self
            .build_request(&HttpCommand::get("/status"))
            .send()
            .await
            .map_err(SessionError::Http)?;
        Self::interpret_response(response).await?;

        debug!("Session health check passed");
        Ok(())
    }
}
