use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use session_bridge_core::InboundEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::error::SinkError;

/// Destination for events that passed the router.
///
/// Native `async fn` makes this trait not object-safe; use [`DynEventSink`]
/// behind `Arc<dyn ...>`. Every `EventSink` implements `DynEventSink` via a
/// blanket implementation.
pub trait EventSink: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Deliver one routed event.
    fn emit(
        &self,
        event: InboundEvent,
    ) -> impl std::future::Future<Output = Result<(), SinkError>> + Send;
}

/// Object-safe sink trait for use behind `Arc<dyn DynEventSink>`.
#[async_trait]
pub trait DynEventSink: Send + Sync {
    fn name(&self) -> &str;

    async fn emit(&self, event: InboundEvent) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: EventSink + Sync> DynEventSink for T {
    fn name(&self) -> &str {
        EventSink::name(self)
    }

    async fn emit(&self, event: InboundEvent) -> Result<(), SinkError> {
        EventSink::emit(self, event).await
    }
}

/// Logs each event and discards it.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "log"
    }

    #[allow(clippy::unused_async)]
    async fn emit(&self, event: InboundEvent) -> Result<(), SinkError> {
        info!(
            event = event.event_name.as_deref().unwrap_or("<none>"),
            received_at = %event.received_at,
            payload = %event.payload,
            "webhook event received"
        );
        Ok(())
    }
}

/// Pushes events into a tokio mpsc channel for in-process consumers.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<InboundEvent>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<InboundEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<InboundEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Enqueue without waiting. Fails with [`SinkError::QueueFull`] when the
    /// channel has no free slot.
    pub fn try_emit(&self, event: InboundEvent) -> Result<(), SinkError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SinkError::ChannelClosed,
        })
    }
}

impl EventSink for ChannelSink {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "channel"
    }

    async fn emit(&self, event: InboundEvent) -> Result<(), SinkError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| SinkError::ChannelClosed)
    }
}

/// POSTs the unchanged webhook body to a downstream URL.
pub struct HttpForwardSink {
    url: String,
    client: Client,
}

impl HttpForwardSink {
    /// Uses a default `reqwest::Client` with the given timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self::with_client(url, client)
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EventSink for HttpForwardSink {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "http-forward"
    }

    #[instrument(skip(self, event), fields(url = %self.url, event = ?event.event_name))]
    async fn emit(&self, event: InboundEvent) -> Result<(), SinkError> {
        debug!("forwarding webhook event");

        let request = self.client.post(&self.url).json(&event.payload);
        let response = session_bridge_provider::inject_trace_context(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "webhook event forwarded");
        Ok(())
    }
}
