use serde::Deserialize;
use session_bridge_core::EventSubscription;

use crate::error::ServerError;

/// Inbound webhook settings (`[trigger]`).
#[derive(Debug, Deserialize)]
pub struct TriggerConfig {
    /// Route the Session Webhook Server posts events to.
    #[serde(default = "default_path")]
    pub path: String,
    /// Event names to pass on. Unnamed events always pass.
    #[serde(default = "default_events")]
    pub events: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            events: default_events(),
        }
    }
}

impl TriggerConfig {
    pub fn subscription(&self) -> Result<EventSubscription, ServerError> {
        EventSubscription::from_names(&self.events)
            .map_err(|e| ServerError::Config(format!("[trigger] events: {e}")))
    }
}

fn default_path() -> String {
    "/webhook".to_owned()
}

fn default_events() -> Vec<String> {
    vec!["message".to_owned()]
}

/// Onward delivery of routed events (`[forward]`).
///
/// Without a `url`, routed events are logged.
#[derive(Debug, Deserialize)]
pub struct ForwardConfig {
    /// URL that receives the unchanged webhook body via POST.
    pub url: Option<String>,
    /// Forward request timeout in seconds.
    #[serde(default = "default_forward_timeout")]
    pub timeout_seconds: u64,
    /// Capacity of the queue between the webhook handler and the forwarder.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_forward_timeout(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_forward_timeout() -> u64 {
    10
}

fn default_queue_capacity() -> usize {
    1024
}

/// Batch dispatch settings (`[dispatch]`).
#[derive(Debug, Default, Deserialize)]
pub struct DispatchServerConfig {
    /// Record per-item failures and keep going instead of aborting.
    #[serde(default)]
    pub continue_on_fail: bool,
}
