//! Splitting V3 cards into display groups.

use serde_json::{Map, Value};

/// Top-level fields shown as a V3 card's summary, in display order.
pub const V3_SUMMARY_KEYS: [&str; 15] = [
    "name",
    "description",
    "personality",
    "scenario",
    "first_mes",
    "mes_example",
    "creatorcomment",
    "avatar",
    "chat",
    "talkativeness",
    "fav",
    "tags",
    "spec",
    "spec_version",
    "create_date",
];

/// A V3 card split into its summary fields and its `data` object.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPartition {
    /// Every key of [`V3_SUMMARY_KEYS`], in order. Absent fields are `""`.
    pub summary: Map<String, Value>,
    /// The card's `data` value, untouched. `{}` when absent.
    pub data: Value,
}

impl KeyPartition {
    /// Split into `(summary, data)`.
    pub fn into_parts(self) -> (Map<String, Value>, Value) {
        (self.summary, self.data)
    }
}

/// Split a V3 document into summary fields and its `data` value.
///
/// Never fails: a document that is not an object is treated as having no
/// fields at all. The document is only read.
pub fn partition_v3_keys(document: &Value) -> KeyPartition {
    let fields = document.as_object();
    let field = |key: &str| fields.and_then(|fields| fields.get(key)).cloned();

    let summary = V3_SUMMARY_KEYS
        .iter()
        .map(|&key| {
            let value = field(key).unwrap_or_else(|| Value::String(String::new()));
            (key.to_string(), value)
        })
        .collect();
    let data = field("data").unwrap_or_else(|| Value::Object(Map::new()));

    KeyPartition { summary, data }
}
