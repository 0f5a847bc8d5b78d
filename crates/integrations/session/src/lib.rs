//! Session Webhook Server client for the Session bridge.
//!
//! This crate implements the [`Transport`](session_bridge_provider::Transport)
//! trait on top of `reqwest`, attaching the configured base URL and the
//! `X-API-Key` header to every command.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use session_bridge_session::{SessionClient, SessionConfig};
//!
//! let config = SessionConfig::new("http://localhost:8080", "my-api-key")
//!     .with_timeout_secs(10);
//! let client = SessionClient::new(config);
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{API_KEY_HEADER, SessionClient};
pub use config::SessionConfig;
pub use error::SessionError;
