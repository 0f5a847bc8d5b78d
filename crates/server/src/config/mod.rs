mod server;
mod session;
mod telemetry;
mod trigger;

#[cfg(test)]
mod tests;

pub use server::*;
pub use session::*;
pub use telemetry::*;
pub use trigger::*;

use std::path::Path;

use serde::Deserialize;
use session_bridge_dispatcher::DispatcherConfig;

use crate::error::ServerError;

/// Environment variable that overrides `[session] api_key`.
pub const API_KEY_ENV: &str = "SESSION_API_KEY";

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct BridgeConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session Webhook Server connection.
    #[serde(default)]
    pub session: SessionServerConfig,
    /// Inbound webhook routing.
    #[serde(default)]
    pub trigger: TriggerConfig,
    /// Onward delivery of routed events.
    #[serde(default)]
    pub forward: ForwardConfig,
    /// Batch dispatch behaviour.
    #[serde(default)]
    pub dispatch: DispatchServerConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl BridgeConfig {
    /// Load from `path`, falling back to defaults when the file does not
    /// exist, then apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_toml(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without touching the environment.
    pub fn from_toml(contents: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace the configured API key when an override is present and
    /// non-empty.
    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.session.api_key = Some(key);
        }
    }

    /// Check settings every command relies on.
    pub fn validate(&self) -> Result<(), ServerError> {
        if !self.trigger.path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "[trigger] path must start with '/', got '{}'",
                self.trigger.path
            )));
        }
        // axum reads these as capture or wildcard syntax and panics on bad ones.
        if self.trigger.path.contains(['{', '}', '*']) {
            return Err(ServerError::Config(format!(
                "[trigger] path must be a literal path without '{{', '}}' or '*', got '{}'",
                self.trigger.path
            )));
        }
        if self.trigger.path == "/health" {
            return Err(ServerError::Config(
                "[trigger] path conflicts with /health".into(),
            ));
        }
        if self.forward.queue_capacity == 0 {
            return Err(ServerError::Config(
                "[forward] queue_capacity must be greater than zero".into(),
            ));
        }
        self.trigger.subscription()?;
        Ok(())
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::default().with_isolate_failures(self.dispatch.continue_on_fail)
    }
}
