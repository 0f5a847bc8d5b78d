use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Events the Session Webhook Server can push back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    Call,
    MediaSaved,
    Message,
    MessageDeleted,
    MessageRead,
    MessageRequestApproved,
    MessageTypingIndicator,
    ReactionAdded,
    ReactionRemoved,
    ScreenshotTaken,
    SyncAvatar,
    SyncDisplayName,
    SyncMessage,
}

impl EventName {
    pub const ALL: [Self; 13] = [
        Self::Call,
        Self::MediaSaved,
        Self::Message,
        Self::MessageDeleted,
        Self::MessageRead,
        Self::MessageRequestApproved,
        Self::MessageTypingIndicator,
        Self::ReactionAdded,
        Self::ReactionRemoved,
        Self::ScreenshotTaken,
        Self::SyncAvatar,
        Self::SyncDisplayName,
        Self::SyncMessage,
    ];

    /// The wire name carried in the webhook body's `event` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::MediaSaved => "mediaSaved",
            Self::Message => "message",
            Self::MessageDeleted => "messageDeleted",
            Self::MessageRead => "messageRead",
            Self::MessageRequestApproved => "messageRequestApproved",
            Self::MessageTypingIndicator => "messageTypingIndicator",
            Self::ReactionAdded => "reactionAdded",
            Self::ReactionRemoved => "reactionRemoved",
            Self::ScreenshotTaken => "screenshotTaken",
            Self::SyncAvatar => "syncAvatar",
            Self::SyncDisplayName => "syncDisplayName",
            Self::SyncMessage => "syncMessage",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name outside the known event set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventName(pub String);

impl FromStr for EventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownEventName(s.to_owned()))
    }
}

/// The set of event names a router lets through.
///
/// Defaults to `{message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSubscription {
    events: BTreeSet<EventName>,
}

impl EventSubscription {
    pub fn new(events: impl IntoIterator<Item = EventName>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// A subscription that matches no named event.
    pub fn empty() -> Self {
        Self {
            events: BTreeSet::new(),
        }
    }

    /// Subscribe to every known event.
    pub fn all() -> Self {
        Self::new(EventName::ALL)
    }

    /// Parse a list of wire names, rejecting anything outside the known set.
    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownEventName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|events| Self { events })
    }

    pub fn contains(&self, event: EventName) -> bool {
        self.events.contains(&event)
    }

    /// Whether a raw event name from the wire is subscribed. Names outside
    /// the known set never match.
    pub fn matches(&self, name: &str) -> bool {
        name.parse().is_ok_and(|event| self.contains(event))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventName> + '_ {
        self.events.iter().copied()
    }
}

impl Default for EventSubscription {
    fn default() -> Self {
        Self::new([EventName::Message])
    }
}

/// A webhook payload received from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// Value of the body's `event` field, or `None` when it is absent or
    /// falsy (`null`, `false`, `0`, `""`).
    pub event_name: Option<String>,

    /// The full body, unchanged.
    pub payload: serde_json::Value,

    /// When the event was received.
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Wrap a received webhook body.
    pub fn from_body(payload: serde_json::Value) -> Self {
        Self {
            event_name: event_name_of(&payload),
            payload,
            received_at: Utc::now(),
        }
    }

    /// Consume the event, returning the original body.
    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }
}

fn event_name_of(body: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match body.get("event")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
