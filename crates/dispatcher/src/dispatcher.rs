use std::sync::Arc;

use serde::{Deserialize, Serialize};
use session_bridge_core::{DispatchResult, Item, OperationRequest};
use session_bridge_provider::{BinaryPayloadSource, DispatchError, DynTransport};
use tracing::{debug, info, instrument, warn};

use crate::command::build_command;
use crate::config::DispatcherConfig;

/// One entry of a dispatch batch: the raw operation parameters collected by
/// the host plus the input item they were collected for.
///
/// Serialized flat, so a batch file looks like
/// `[{"parameters": {"operation": "sendMessage", ...}, "json": {...}, "binary": {...}}]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// Raw operation parameters, tagged by `operation`.
    pub parameters: serde_json::Value,

    /// The input item: echoed back on failure, source of binary payloads.
    #[serde(flatten)]
    pub item: Item,
}

impl BatchItem {
    pub fn new(parameters: serde_json::Value, item: Item) -> Self {
        Self { parameters, item }
    }

    /// Build an entry from an already validated request.
    pub fn from_request(request: &OperationRequest, item: Item) -> Self {
        Self::new(request.to_parameters(), item)
    }
}

/// Maps operation requests onto HTTP calls against the Session Webhook
/// Server, one call per item, strictly in input order.
pub struct CommandDispatcher {
    transport: Arc<dyn DynTransport>,
    config: DispatcherConfig,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn DynTransport>, config: DispatcherConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatch every item of the batch, in order.
    ///
    /// With isolation enabled every item yields exactly one result and
    /// `results[i]` belongs to `batch[i]`. With isolation disabled the first
    /// failure is returned as-is and the remaining items are never sent;
    /// calls already made are not rolled back.
    #[instrument(
        skip(self, batch),
        fields(
            transport = self.transport.name(),
            items = batch.len(),
            isolate = self.config.isolate_failures,
        )
    )]
    pub async fn dispatch(&self, batch: &[BatchItem]) -> Result<Vec<DispatchResult>, DispatchError> {
        let mut results = Vec::with_capacity(batch.len());

        for (index, entry) in batch.iter().enumerate() {
            match self.dispatch_item(entry).await {
                Ok(json) => results.push(DispatchResult::success(json)),
                Err(err) if self.config.isolate_failures => {
                    let retryable = err.is_retryable();
                    warn!(index, kind = %err.kind(), retryable, error = %err, "item failed, continuing");
                    results.push(
                        DispatchResult::failure(entry.item.json.clone(), err.kind(), err.to_string())
                            .with_retryable(retryable),
                    );
                }
                Err(err) => {
                    warn!(
                        index,
                        kind = %err.kind(),
                        retryable = err.is_retryable(),
                        error = %err,
                        "item failed, aborting batch"
                    );
                    return Err(err);
                }
            }
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            succeeded = results.len() - failed,
            failed, "batch dispatched"
        );

        Ok(results)
    }

    /// Build and send a single request, returning the remote response body.
    pub async fn dispatch_one(
        &self,
        request: &OperationRequest,
        source: &dyn BinaryPayloadSource,
    ) -> Result<serde_json::Value, DispatchError> {
        let command = build_command(request, source)?;
        debug!(
            operation = %request.kind(),
            method = %command.method,
            path = command.path,
            "dispatching command"
        );
        self.transport.send(&command).await
    }

    /// Check the remote service through the transport.
    pub async fn health_check(&self) -> Result<(), DispatchError> {
        self.transport.health_check().await
    }

    async fn dispatch_item(&self, entry: &BatchItem) -> Result<serde_json::Value, DispatchError> {
        let request = OperationRequest::from_parameters(&entry.parameters)?;
        self.dispatch_one(&request, &entry.item).await
    }
}

#[cfg(test)]
#[allow(clippy::unnecessary_literal_bound)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use session_bridge_core::{BinaryData, ErrorKind, HttpCommand};

    use super::*;

    /// Records every command and answers from a fixed script.
    struct RecordingTransport {
        calls: AtomicUsize,
        sent: Mutex<Vec<HttpCommand>>,
        failing_path: Option<&'static str>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
                failing_path: None,
            }
        }

        fn failing_on(path: &'static str) -> Self {
            Self {
                failing_path: Some(path),
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DynTransport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, command: &HttpCommand) -> Result<serde_json::Value, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(command.clone());
            if self.failing_path == Some(command.path) {
                return Err(DispatchError::Remote {
                    status: 500,
                    body: "client offline".into(),
                });
            }
            Ok(json!({ "success": true, "path": command.path }))
        }

        async fn health_check(&self) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    fn dispatcher(transport: &Arc<RecordingTransport>, isolate: bool) -> CommandDispatcher {
        CommandDispatcher::new(
            Arc::clone(transport) as Arc<dyn DynTransport>,
            DispatcherConfig::default().with_isolate_failures(isolate),
        )
    }

    fn send_message(row: u32) -> BatchItem {
        BatchItem::new(
            json!({"operation": "sendMessage", "to": "05abc", "text": format!("msg {row}")}),
            Item::new(json!({ "row": row })),
        )
    }

    fn avatar_without_binary(row: u32) -> BatchItem {
        BatchItem::new(
            json!({"operation": "setAvatar"}),
            Item::new(json!({ "row": row })),
        )
    }

    #[tokio::test]
    async fn results_follow_input_order_under_isolation() {
        let transport = Arc::new(RecordingTransport::failing_on("/notifyScreenshot"));
        let dispatcher = dispatcher(&transport, true);

        let batch = vec![
            send_message(0),
            avatar_without_binary(1),
            BatchItem::new(json!({"operation": "blockUser"}), Item::new(json!({"row": 2}))),
            BatchItem::new(
                json!({"operation": "notifyScreenshot", "to": "05abc"}),
                Item::new(json!({"row": 3})),
            ),
            BatchItem::new(
                json!({"operation": "sendMessage", "to": "05abc"}),
                Item::new(json!({"row": 4})),
            ),
            send_message(5),
        ];

        let results = dispatcher.dispatch(&batch).await.unwrap();
        assert_eq!(results.len(), batch.len());

        let kinds: Vec<_> = results.iter().map(DispatchResult::error_kind).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(ErrorKind::MissingBinaryData),
                Some(ErrorKind::UnsupportedOperation),
                Some(ErrorKind::RemoteError),
                Some(ErrorKind::InvalidRequest),
                None,
            ]
        );

        for (index, result) in results.iter().enumerate().filter(|(_, r)| !r.is_success()) {
            assert_eq!(result.json()["row"], index, "failure must echo its own input");
        }
        assert_eq!(results[0].json()["path"], "/sendMessage");

        // Only items 0, 3 and 5 reached the transport.
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn failures_carry_retryable_flag() {
        let transport = Arc::new(RecordingTransport::failing_on("/notifyScreenshot"));
        let dispatcher = dispatcher(&transport, true);

        let batch = vec![
            BatchItem::new(
                json!({"operation": "notifyScreenshot", "to": "05abc"}),
                Item::default(),
            ),
            avatar_without_binary(1),
        ];

        let results = dispatcher.dispatch(&batch).await.unwrap();
        let retryable: Vec<_> = results
            .iter()
            .map(|r| match r {
                DispatchResult::Failure { error, .. } => error.retryable,
                DispatchResult::Success { .. } => panic!("expected failure, got {r:?}"),
            })
            .collect();
        // Remote 500 is transient; a missing binary is not.
        assert_eq!(retryable, vec![true, false]);
    }

    #[tokio::test]
    async fn missing_binary_issues_no_call() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher(&transport, true);

        let batch = vec![
            avatar_without_binary(0),
            BatchItem::new(
                json!({"operation": "sendAttachment", "to": "05abc", "binaryPropertyName": "file"}),
                Item::new(json!({})).with_binary("data", BinaryData::from_bytes(b"wrong property")),
            ),
        ];

        let results = dispatcher.dispatch(&batch).await.unwrap();
        assert!(
            results
                .iter()
                .all(|r| r.error_kind() == Some(ErrorKind::MissingBinaryData))
        );
        assert_eq!(transport.calls(), 0);

        match &results[1] {
            DispatchResult::Failure { error, .. } => assert!(error.message.contains("'file'")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_operation_issues_no_call() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher(&transport, false);

        let err = dispatcher
            .dispatch(&[BatchItem::new(json!({"operation": "blockUser"}), Item::default())])
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedOperation(ref name) if name == "blockUser"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn without_isolation_first_failure_aborts() {
        let transport = Arc::new(RecordingTransport::failing_on("/notifyScreenshot"));
        let dispatcher = dispatcher(&transport, false);

        let batch = vec![
            send_message(0),
            BatchItem::new(
                json!({"operation": "notifyScreenshot", "to": "05abc"}),
                Item::default(),
            ),
            send_message(2),
        ];

        let err = dispatcher.dispatch(&batch).await.unwrap_err();
        assert!(matches!(err, DispatchError::Remote { status: 500, .. }));
        // Item 2 is never sent; item 0 stays sent.
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn attachment_body_reaches_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher(&transport, false);

        let request = OperationRequest::SendAttachment {
            to: "05abc".into(),
            filename: "hello.txt".into(),
            mime_type: "text/plain".into(),
            binary_ref: session_bridge_core::BinaryRef::default(),
        };
        let item = Item::default().with_binary("data", BinaryData::from_bytes(b"Hello World"));

        let results = dispatcher
            .dispatch(&[BatchItem::from_request(&request, item)])
            .await
            .unwrap();
        assert!(results[0].is_success());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/sendAttachment");
        assert_eq!(
            sent[0].body.as_ref().unwrap()["data"],
            "SGVsbG8gV29ybGQ="
        );
    }

    #[tokio::test]
    async fn dispatch_is_deterministic() {
        let transport = Arc::new(RecordingTransport::failing_on("/setDisplayName"));
        let dispatcher = dispatcher(&transport, true);

        let batch = vec![
            send_message(0),
            BatchItem::new(
                json!({"operation": "setDisplayName", "displayName": "Bot"}),
                Item::new(json!({"row": 1})),
            ),
            BatchItem::new(json!({"operation": "getStatus"}), Item::default()),
        ];

        let first = dispatcher.dispatch(&batch).await.unwrap();
        let second = dispatcher.dispatch(&batch).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_batch() {
        let transport = Arc::new(RecordingTransport::new());
        let results = dispatcher(&transport, true).dispatch(&[]).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn dispatch_one_get_status() {
        let transport = Arc::new(RecordingTransport::new());
        let body = dispatcher(&transport, false)
            .dispatch_one(
                &OperationRequest::GetStatus {},
                &session_bridge_provider::NoBinaryData,
            )
            .await
            .unwrap();
        assert_eq!(body["path"], "/status");
        assert!(transport.sent.lock().unwrap()[0].body.is_none());
    }

    #[tokio::test]
    async fn health_check_goes_through_transport() {
        let transport = Arc::new(RecordingTransport::new());
        assert!(dispatcher(&transport, false).health_check().await.is_ok());
    }

    #[test]
    fn batch_item_deserializes_flat() {
        let entry: BatchItem = serde_json::from_value(json!({
            "parameters": {"operation": "setAvatar", "binaryPropertyName": "pic"},
            "json": {"id": 7},
            "binary": {"pic": {"data": "cG5n", "mimeType": "image/png"}}
        }))
        .unwrap();
        assert_eq!(entry.item.json["id"], 7);
        assert!(entry.item.binary("pic").is_some());
        assert_eq!(entry.parameters["operation"], "setAvatar");
    }
}
