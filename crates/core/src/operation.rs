use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binary::BinaryRef;
use crate::command::HttpMethod;

/// The operations exposed by the remote messaging-control service.
///
/// This is the field-less mirror of [`OperationRequest`] and owns the static
/// routing table: operation name, HTTP method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    SendMessage,
    SendAttachment,
    DeleteMessage,
    SetDisplayName,
    SetAvatar,
    NotifyScreenshot,
    NotifyMediaSaved,
    AddReaction,
    RemoveReaction,
    GetStatus,
}

impl OperationKind {
    /// Every supported operation, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::SendMessage,
        Self::SendAttachment,
        Self::DeleteMessage,
        Self::SetDisplayName,
        Self::SetAvatar,
        Self::NotifyScreenshot,
        Self::NotifyMediaSaved,
        Self::AddReaction,
        Self::RemoveReaction,
        Self::GetStatus,
    ];

    /// The operation name as used in parameters (`sendMessage`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::SendMessage => "sendMessage",
            Self::SendAttachment => "sendAttachment",
            Self::DeleteMessage => "deleteMessage",
            Self::SetDisplayName => "setDisplayName",
            Self::SetAvatar => "setAvatar",
            Self::NotifyScreenshot => "notifyScreenshot",
            Self::NotifyMediaSaved => "notifyMediaSaved",
            Self::AddReaction => "addReaction",
            Self::RemoveReaction => "removeReaction",
            Self::GetStatus => "getStatus",
        }
    }

    /// Path on the remote service, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::SendMessage => "/sendMessage",
            Self::SendAttachment => "/sendAttachment",
            Self::DeleteMessage => "/deleteMessage",
            Self::SetDisplayName => "/setDisplayName",
            Self::SetAvatar => "/setAvatar",
            Self::NotifyScreenshot => "/notifyScreenshot",
            Self::NotifyMediaSaved => "/notifyMediaSaved",
            Self::AddReaction => "/addReaction",
            Self::RemoveReaction => "/removeReaction",
            Self::GetStatus => "/status",
        }
    }

    /// HTTP method for this operation.
    pub fn method(self) -> HttpMethod {
        match self {
            Self::GetStatus => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Whether the operation carries a binary payload.
    pub fn requires_binary(self) -> bool {
        matches!(self, Self::SendAttachment | Self::SetAvatar)
    }

    /// Parse an operation name. Matching is exact (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while constructing an [`OperationRequest`] from raw host
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The parameters carry no `operation` string.
    #[error("missing 'operation' parameter")]
    MissingOperation,

    /// The `operation` name is not one of the known operations.
    #[error("the operation '{0}' is not supported")]
    Unsupported(String),

    /// A required field is missing or has the wrong type.
    #[error("invalid parameters for '{operation}': {reason}")]
    InvalidParameters {
        operation: OperationKind,
        reason: String,
    },
}

/// A validated request for one remote operation.
///
/// Serialized form is the flat parameter object collected by the host, tagged
/// by `operation`:
///
/// ```json
/// {"operation": "sendMessage", "to": "05ab...", "text": "hi"}
/// ```
///
/// Every required field is checked when the request is built, so a value of
/// this type can always be turned into an HTTP command (binary payload
/// resolution aside).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "operation",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OperationRequest {
    SendMessage {
        to: String,
        text: String,
    },
    SendAttachment {
        to: String,
        #[serde(default = "default_filename")]
        filename: String,
        #[serde(default = "default_mime_type")]
        mime_type: String,
        #[serde(rename = "binaryPropertyName", default)]
        binary_ref: BinaryRef,
    },
    DeleteMessage {
        to: String,
        timestamp: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
    },
    SetDisplayName {
        display_name: String,
    },
    SetAvatar {
        #[serde(rename = "binaryPropertyName", default)]
        binary_ref: BinaryRef,
    },
    NotifyScreenshot {
        to: String,
    },
    NotifyMediaSaved {
        to: String,
        timestamp: u64,
    },
    AddReaction {
        to: String,
        timestamp: u64,
        #[serde(default = "default_emoji")]
        emoji: String,
        author: String,
    },
    RemoveReaction {
        to: String,
        timestamp: u64,
        #[serde(default = "default_emoji")]
        emoji: String,
        author: String,
    },
    GetStatus {},
}

fn default_filename() -> String {
    "file.dat".to_owned()
}

fn default_mime_type() -> String {
    "application/octet-stream".to_owned()
}

fn default_emoji() -> String {
    "\u{1F44D}".to_owned()
}

impl OperationRequest {
    /// Build a request from the raw parameter object collected by the host.
    ///
    /// Unknown operation names are reported as [`OperationError::Unsupported`]
    /// before any field is looked at.
    pub fn from_parameters(parameters: &serde_json::Value) -> Result<Self, OperationError> {
        let name = parameters
            .get("operation")
            .and_then(serde_json::Value::as_str)
            .ok_or(OperationError::MissingOperation)?;
        let kind = OperationKind::from_name(name)
            .ok_or_else(|| OperationError::Unsupported(name.to_owned()))?;

        serde_json::from_value(parameters.clone()).map_err(|e| {
            OperationError::InvalidParameters {
                operation: kind,
                reason: e.to_string(),
            }
        })
    }

    /// Render the request back into its flat parameter object.
    pub fn to_parameters(&self) -> serde_json::Value {
        // Strings, integers and a tag only: serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// The operation this request targets.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SendMessage { .. } => OperationKind::SendMessage,
            Self::SendAttachment { .. } => OperationKind::SendAttachment,
            Self::DeleteMessage { .. } => OperationKind::DeleteMessage,
            Self::SetDisplayName { .. } => OperationKind::SetDisplayName,
            Self::SetAvatar { .. } => OperationKind::SetAvatar,
            Self::NotifyScreenshot { .. } => OperationKind::NotifyScreenshot,
            Self::NotifyMediaSaved { .. } => OperationKind::NotifyMediaSaved,
            Self::AddReaction { .. } => OperationKind::AddReaction,
            Self::RemoveReaction { .. } => OperationKind::RemoveReaction,
            Self::GetStatus {} => OperationKind::GetStatus,
        }
    }

    /// The binary payload this request needs, if any.
    pub fn binary_ref(&self) -> Option<&BinaryRef> {
        match self {
            Self::SendAttachment { binary_ref, .. } | Self::SetAvatar { binary_ref } => {
                Some(binary_ref)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn routing_table() {
        assert_eq!(OperationKind::GetStatus.path(), "/status");
        assert_eq!(OperationKind::GetStatus.method(), HttpMethod::Get);
        for kind in OperationKind::ALL
            .into_iter()
            .filter(|k| *k != OperationKind::GetStatus)
        {
            assert_eq!(kind.method(), HttpMethod::Post);
            assert_eq!(kind.path(), format!("/{}", kind.name()));
        }
    }

    #[test]
    fn from_name_is_case_sensitive() {
        assert!(OperationKind::from_name("SendMessage").is_none());
        assert!(OperationKind::from_name("send_message").is_none());
    }

    #[test]
    fn parses_send_message() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "sendMessage",
            "to": "05abc",
            "text": "hello"
        }))
        .unwrap();
        assert_eq!(
            req,
            OperationRequest::SendMessage {
                to: "05abc".into(),
                text: "hello".into()
            }
        );
        assert_eq!(req.kind(), OperationKind::SendMessage);
    }

    #[test]
    fn attachment_defaults_apply() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "sendAttachment",
            "to": "05abc"
        }))
        .unwrap();
        match &req {
            OperationRequest::SendAttachment {
                filename,
                mime_type,
                binary_ref,
                ..
            } => {
                assert_eq!(filename, "file.dat");
                assert_eq!(mime_type, "application/octet-stream");
                assert_eq!(binary_ref.property(), "data");
            }
            other => panic!("expected SendAttachment, got {other:?}"),
        }
        assert_eq!(req.binary_ref().map(BinaryRef::property), Some("data"));
    }

    #[test]
    fn reaction_emoji_defaults_to_thumbs_up() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "removeReaction",
            "to": "05abc",
            "timestamp": 42,
            "author": "05def"
        }))
        .unwrap();
        assert_eq!(
            req,
            OperationRequest::RemoveReaction {
                to: "05abc".into(),
                timestamp: 42,
                emoji: "\u{1F44D}".into(),
                author: "05def".into()
            }
        );
    }

    #[test]
    fn avatar_reads_binary_property_name() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "setAvatar",
            "binaryPropertyName": "picture"
        }))
        .unwrap();
        assert_eq!(req.binary_ref().unwrap().property(), "picture");
    }

    #[test]
    fn get_status_ignores_extra_parameters() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "getStatus",
            "to": "ignored"
        }))
        .unwrap();
        assert_eq!(req, OperationRequest::GetStatus {});
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = OperationRequest::from_parameters(&json!({
            "operation": "addReaction",
            "to": "05abc",
            "timestamp": 1_700_000_000_000_u64,
            "emoji": "x"
        }))
        .unwrap_err();
        match err {
            OperationError::InvalidParameters { operation, reason } => {
                assert_eq!(operation, OperationKind::AddReaction);
                assert!(reason.contains("author"), "reason was: {reason}");
            }
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }

    #[test]
    fn unknown_operation_is_unsupported() {
        let err = OperationRequest::from_parameters(&json!({"operation": "blockUser"}))
            .unwrap_err();
        assert_eq!(err, OperationError::Unsupported("blockUser".into()));
        assert_eq!(err.to_string(), "the operation 'blockUser' is not supported");
    }

    #[test]
    fn missing_operation() {
        let err = OperationRequest::from_parameters(&json!({"to": "05abc"})).unwrap_err();
        assert_eq!(err, OperationError::MissingOperation);
    }

    #[test]
    fn delete_hash_is_optional() {
        let req = OperationRequest::from_parameters(&json!({
            "operation": "deleteMessage",
            "to": "05abc",
            "timestamp": 42
        }))
        .unwrap();
        assert_eq!(
            req,
            OperationRequest::DeleteMessage {
                to: "05abc".into(),
                timestamp: 42,
                hash: None
            }
        );
    }

    #[test]
    fn to_parameters_uses_wire_names() {
        let req = OperationRequest::SetDisplayName {
            display_name: "Bot".into(),
        };
        let params = req.to_parameters();
        assert_eq!(params["operation"], "setDisplayName");
        assert_eq!(params["displayName"], "Bot");
        assert_eq!(OperationRequest::from_parameters(&params).unwrap(), req);
    }
}
