use session_bridge_core::{BinaryData, BinaryRef, Item};

/// Source of binary payloads referenced by operation requests.
///
/// Implemented by whatever holds the caller's item data. The dispatcher only
/// reads through this trait; it never takes ownership of the bytes.
pub trait BinaryPayloadSource: Send + Sync {
    /// Resolve a reference, or `None` when the property is absent.
    fn resolve(&self, reference: &BinaryRef) -> Option<&BinaryData>;
}

impl BinaryPayloadSource for Item {
    fn resolve(&self, reference: &BinaryRef) -> Option<&BinaryData> {
        self.binary(reference.property())
    }
}

/// A source with no binary data at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBinaryData;

impl BinaryPayloadSource for NoBinaryData {
    fn resolve(&self, _reference: &BinaryRef) -> Option<&BinaryData> {
        None
    }
}
