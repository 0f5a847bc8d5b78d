use session_bridge_core::{EventSubscription, InboundEvent};
use tracing::debug;

/// Filters inbound webhook events against a fixed subscription.
///
/// An event whose name is present and not subscribed is dropped. Events
/// without a name, and subscribed events, pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct WebhookEventRouter {
    subscription: EventSubscription,
}

impl WebhookEventRouter {
    pub fn new(subscription: EventSubscription) -> Self {
        Self { subscription }
    }

    pub fn subscription(&self) -> &EventSubscription {
        &self.subscription
    }

    /// Returns the event when it should be emitted, `None` when dropped.
    pub fn route(&self, event: InboundEvent) -> Option<InboundEvent> {
        match event.event_name.as_deref() {
            Some(name) if !self.subscription.matches(name) => {
                debug!(event = name, "event not subscribed, dropping");
                None
            }
            _ => Some(event),
        }
    }
}
