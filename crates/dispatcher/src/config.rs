/// Configuration for the [`CommandDispatcher`](crate::CommandDispatcher).
///
/// The base URL and API key belong to the transport, not to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// When `true`, a failing item is recorded as a failure result and the
    /// batch continues. When `false` (the default), the first failure aborts
    /// the batch and is returned to the caller.
    pub isolate_failures: bool,
}

impl DispatcherConfig {
    #[must_use]
    pub fn with_isolate_failures(mut self, isolate: bool) -> Self {
        self.isolate_failures = isolate;
        self
    }
}
