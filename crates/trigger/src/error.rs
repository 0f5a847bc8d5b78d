use thiserror::Error;

/// Errors raised while handing a routed event to its sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The forward request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The forward target answered with a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The receiving end of a channel sink was dropped.
    #[error("event channel closed")]
    ChannelClosed,

    /// A bounded channel sink had no free slot.
    #[error("event queue full")]
    QueueFull,
}
