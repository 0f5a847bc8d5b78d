use serde::Deserialize;
use session_bridge_session::SessionConfig;

use crate::error::ServerError;

/// Connection to the Session Webhook Server (`[session]`).
///
/// Only the `dispatch` and `status` commands need it; the webhook server
/// runs without it.
#[derive(Default, Deserialize)]
pub struct SessionServerConfig {
    /// Base URL, e.g. `http://localhost:8080`.
    pub base_url: Option<String>,
    /// API key sent as `X-API-Key`. Overridden by `SESSION_API_KEY`.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds (default 30).
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for SessionServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl SessionServerConfig {
    /// Build the client configuration, failing when the URL or key is missing.
    pub fn to_client_config(&self) -> Result<SessionConfig, ServerError> {
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ServerError::Config("[session] base_url is required".into()))?;
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ServerError::Config(
                    "[session] api_key or the SESSION_API_KEY environment variable is required"
                        .into(),
                )
            })?;

        let mut config = SessionConfig::new(base_url, api_key);
        if let Some(secs) = self.timeout_seconds {
            config = config.with_timeout_secs(secs);
        }
        Ok(config)
    }
}
