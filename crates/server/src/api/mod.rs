pub mod health;
pub mod trace_context;
pub mod webhook;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use session_bridge_trigger::{ChannelSink, WebhookEventRouter};
use tower_http::trace::TraceLayer;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Subscription filter applied to every inbound event.
    pub router: Arc<WebhookEventRouter>,
    /// Bounded hand-off to the forwarder; full means the event is dropped.
    pub queue: ChannelSink,
}

impl AppState {
    pub fn new(router: WebhookEventRouter, queue: ChannelSink) -> Self {
        Self {
            router: Arc::new(router),
            queue,
        }
    }
}

/// Build the Axum router: `GET /health` plus `POST {webhook_path}`.
pub fn router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(webhook_path, post(webhook::receive))
        .with_state(state)
        .layer(middleware::from_fn(trace_context::propagate_trace_context))
        .layer(TraceLayer::new_for_http())
}
