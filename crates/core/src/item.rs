use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::binary::BinaryData;

/// A host input item: arbitrary JSON plus named binary properties.
///
/// The JSON part is echoed back unchanged when the item's operation fails
/// under per-item isolation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item JSON data.
    #[serde(default)]
    pub json: serde_json::Value,

    /// Binary properties keyed by property name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary: BTreeMap<String, BinaryData>,
}

impl Item {
    /// Create an item with the given JSON and no binary properties.
    pub fn new(json: serde_json::Value) -> Self {
        Self {
            json,
            binary: BTreeMap::new(),
        }
    }

    /// Attach a binary property.
    #[must_use]
    pub fn with_binary(mut self, property: impl Into<String>, data: BinaryData) -> Self {
        self.binary.insert(property.into(), data);
        self
    }

    /// Look up a binary property by name.
    pub fn binary(&self, property: &str) -> Option<&BinaryData> {
        self.binary.get(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_binary() {
        let item: Item = serde_json::from_str(r#"{"json":{"id":1}}"#).unwrap();
        assert_eq!(item.json["id"], 1);
        assert!(item.binary.is_empty());
    }

    #[test]
    fn binary_lookup() {
        let item = Item::default().with_binary("file", BinaryData::from_bytes(b"x"));
        assert!(item.binary("file").is_some());
        assert!(item.binary("data").is_none());
    }
}
