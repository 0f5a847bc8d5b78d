use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use session_bridge_core::InboundEvent;
use session_bridge_trigger::DynEventSink;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::AppState;
use crate::error::ServerError;

/// Receive one event pushed by the Session Webhook Server.
///
/// Routing is synchronous and the hand-off never waits: when the forward
/// queue is full the event is dropped with a warning. Every parsed body is
/// acknowledged, whatever the filter outcome.
#[allow(clippy::unused_async)]
pub async fn receive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| ServerError::InvalidPayload(e.to_string()))?;

    if let Some(event) = state.router.route(InboundEvent::from_body(payload)) {
        let name = event.event_name.clone();
        if let Err(e) = state.queue.try_emit(event) {
            warn!(event = ?name, error = %e, "dropping webhook event");
        }
    }

    Ok((StatusCode::OK, Json(serde_json::json!({ "received": true }))))
}

/// Drain queued events into the final sink until every sender is gone.
///
/// Delivery failures are logged and the event is discarded; no retry.
pub async fn run_forwarder(mut queue: mpsc::Receiver<InboundEvent>, sink: Arc<dyn DynEventSink>) {
    let mut delivered = 0u64;
    while let Some(event) = queue.recv().await {
        let name = event.event_name.clone();
        match sink.emit(event).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                warn!(sink = sink.name(), event = ?name, error = %e, "failed to forward webhook event");
            }
        }
    }
    debug!(delivered, "event queue closed");
}

#[cfg(test)]
#[allow(clippy::unnecessary_literal_bound)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use session_bridge_trigger::SinkError;

    use super::*;

    #[derive(Default)]
    struct FlakySink {
        seen: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl DynEventSink for FlakySink {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn emit(&self, event: InboundEvent) -> Result<(), SinkError> {
            let fail = event.payload["fail"] == true;
            self.seen.lock().unwrap().push(event.into_payload());
            if fail {
                Err(SinkError::ChannelClosed)
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn forwarder_keeps_going_after_failures() {
        let (tx, rx) = mpsc::channel(8);
        let sink = Arc::new(FlakySink::default());

        tx.send(InboundEvent::from_body(json!({"n": 1, "fail": true})))
            .await
            .unwrap();
        tx.send(InboundEvent::from_body(json!({"n": 2}))).await.unwrap();
        drop(tx);

        run_forwarder(rx, Arc::clone(&sink) as Arc<dyn DynEventSink>).await;

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1]["n"], 2);
    }
}
