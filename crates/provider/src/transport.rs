use async_trait::async_trait;
use session_bridge_core::HttpCommand;

use crate::error::DispatchError;

/// Authenticated HTTP transport to the remote messaging-control service.
///
/// Implementations own the base URL and the API key and attach both to every
/// command. Native `async fn` makes this trait not object-safe; use
/// [`DynTransport`] for dynamic dispatch. Every `Transport` implements
/// `DynTransport` via a blanket implementation.
pub trait Transport: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Send one command and return the parsed 2xx response body.
    fn send(
        &self,
        command: &HttpCommand,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, DispatchError>> + Send;

    /// Check that the remote service is reachable and accepts our credentials.
    fn health_check(&self)
    -> impl std::future::Future<Output = Result<(), DispatchError>> + Send;
}

/// Object-safe transport trait for use behind `Arc<dyn DynTransport>`.
///
/// You generally should not implement this trait directly -- implement
/// [`Transport`] and rely on the blanket implementation.
#[async_trait]
pub trait DynTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, command: &HttpCommand) -> Result<serde_json::Value, DispatchError>;

    async fn health_check(&self) -> Result<(), DispatchError>;
}

#[async_trait]
impl<T: Transport + Sync> DynTransport for T {
    fn name(&self) -> &str {
        Transport::name(self)
    }

    async fn send(&self, command: &HttpCommand) -> Result<serde_json::Value, DispatchError> {
        Transport::send(self, command).await
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        Transport::health_check(self).await
    }
}
