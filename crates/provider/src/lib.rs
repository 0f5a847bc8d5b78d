pub mod dry_run;
pub mod error;
pub mod payload;
pub mod transport;

pub use dry_run::DryRunTransport;
pub use error::DispatchError;
pub use payload::{BinaryPayloadSource, NoBinaryData};
pub use transport::{DynTransport, Transport};

// Outbound W3C Trace Context injection, requires reqwest.
#[cfg(feature = "trace-context")]
pub mod trace_context;
#[cfg(feature = "trace-context")]
pub use trace_context::inject_trace_context;
