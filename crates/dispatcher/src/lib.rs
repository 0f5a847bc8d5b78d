//! Command dispatcher for the Session bridge.
//!
//! Turns a batch of host items into one HTTP call each against the Session
//! Webhook Server, in input order, with optional per-item failure isolation.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use session_bridge_dispatcher::{BatchItem, CommandDispatcher, DispatcherConfig};
//! # async fn example(transport: Arc<dyn session_bridge_provider::DynTransport>) {
//! let dispatcher = CommandDispatcher::new(transport, DispatcherConfig::default().with_isolate_failures(true));
//! let batch: Vec<BatchItem> = vec![];
//! let results = dispatcher.dispatch(&batch).await.unwrap();
//! assert_eq!(results.len(), batch.len());
//! # }
//! ```

pub mod command;
pub mod config;
pub mod dispatcher;

pub use command::build_command;
pub use config::DispatcherConfig;
pub use dispatcher::{BatchItem, CommandDispatcher};
