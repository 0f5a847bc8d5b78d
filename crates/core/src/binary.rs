use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Name of the binary property read when the caller does not specify one.
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// Reference to a binary payload held by the caller, identified by the name
/// of the binary property on the input item.
///
/// The dispatcher never owns the referenced bytes; it resolves the reference
/// through a payload source at command-building time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryRef {
    property: String,
}

impl BinaryRef {
    /// Create a reference to the named binary property.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }

    /// The binary property this reference points at.
    pub fn property(&self) -> &str {
        &self.property
    }
}

impl Default for BinaryRef {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_PROPERTY)
    }
}

impl std::fmt::Display for BinaryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.property)
    }
}

/// A binary payload attached to an input item.
///
/// `data` is always base64 (standard alphabet, padded); it is forwarded to the
/// remote service as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    /// Base64-encoded content.
    pub data: String,

    /// MIME type of the content, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Original file name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl BinaryData {
    /// Wrap an already base64-encoded payload.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: None,
            file_name: None,
        }
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_base64(STANDARD.encode(bytes))
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}
