use session_bridge_core::HttpCommand;
use tracing::info;

use crate::error::DispatchError;
use crate::transport::Transport;

/// A transport that logs each command and answers success without
/// performing any network I/O.
///
/// Useful for checking what a batch would send before pointing it at a real
/// Session Webhook Server.
#[derive(Debug, Default)]
pub struct DryRunTransport;

impl DryRunTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for DryRunTransport {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn send(&self, command: &HttpCommand) -> Result<serde_json::Value, DispatchError> {
        info!(
            method = %command.method,
            path = command.path,
            "dry run: command not sent"
        );
        Ok(serde_json::json!({
            "dryRun": true,
            "method": command.method,
            "path": command.path,
            "body": command.body,
        }))
    }

    #[allow(clippy::unused_async)]
    async fn health_check(&self) -> Result<(), DispatchError> {
        Ok(())
    }
}
