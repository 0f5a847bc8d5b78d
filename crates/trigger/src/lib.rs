//! Inbound side of the Session bridge.
//!
//! [`WebhookEventRouter`] decides which webhook payloads pushed by the
//! Session Webhook Server are passed on; an [`EventSink`] receives the ones
//! that pass.

pub mod error;
pub mod router;
pub mod sink;

pub use error::SinkError;
pub use router::WebhookEventRouter;
pub use sink::{ChannelSink, DynEventSink, EventSink, HttpForwardSink, LogSink};
