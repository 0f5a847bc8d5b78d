use serde_json::json;
use session_bridge_core::{BinaryData, BinaryRef, HttpCommand, OperationRequest};
use session_bridge_provider::{BinaryPayloadSource, DispatchError};

/// Map a request onto the HTTP call the remote service expects.
///
/// Body field names are the remote API's wire contract. Binary payloads are
/// resolved here, so a missing payload fails before any I/O happens.
pub fn build_command(
    request: &OperationRequest,
    source: &dyn BinaryPayloadSource,
) -> Result<HttpCommand, DispatchError> {
    let kind = request.kind();

    let body = match request {
        OperationRequest::GetStatus {} => return Ok(HttpCommand::get(kind.path())),
        OperationRequest::SendMessage { to, text } => json!({
            "to": to,
            "text": text,
        }),
        OperationRequest::SendAttachment {
            to,
            filename,
            mime_type,
            binary_ref,
        } => {
            let attachment = resolve(source, binary_ref)?;
            json!({
                "to": to,
                "filename": filename,
                "mimeType": mime_type,
                "data": attachment.data,
            })
        }
        OperationRequest::DeleteMessage {
            to,
            timestamp,
            hash,
        } => json!({
            "to": to,
            "timestamp": timestamp,
            "hash": hash.as_deref().unwrap_or_default(),
        }),
        OperationRequest::SetDisplayName { display_name } => json!({
            "displayName": display_name,
        }),
        OperationRequest::SetAvatar { binary_ref } => {
            let avatar = resolve(source, binary_ref)?;
            json!({ "avatar": avatar.data })
        }
        OperationRequest::NotifyScreenshot { to } => json!({ "to": to }),
        OperationRequest::NotifyMediaSaved { to, timestamp } => json!({
            "to": to,
            "timestamp": timestamp,
        }),
        OperationRequest::AddReaction {
            to,
            timestamp,
            emoji,
            author,
        }
        | OperationRequest::RemoveReaction {
            to,
            timestamp,
            emoji,
            author,
        } => json!({
            "to": to,
            "timestamp": timestamp,
            "emoji": emoji,
            "author": author,
        }),
    };

    Ok(HttpCommand::post(kind.path(), body))
}

fn resolve<'a>(
    source: &'a dyn BinaryPayloadSource,
    reference: &BinaryRef,
) -> Result<&'a BinaryData, DispatchError> {
    source
        .resolve(reference)
        .ok_or_else(|| DispatchError::MissingBinaryData {
            property: reference.property().to_owned(),
        })
}
