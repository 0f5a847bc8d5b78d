pub mod binary;
pub mod command;
pub mod event;
pub mod item;
pub mod operation;
pub mod result;

pub use binary::{BinaryData, BinaryRef};
pub use command::{HttpCommand, HttpMethod};
pub use event::{EventName, EventSubscription, InboundEvent, UnknownEventName};
pub use item::Item;
pub use operation::{OperationError, OperationKind, OperationRequest};
pub use result::{DispatchFailure, DispatchResult, ErrorKind};
