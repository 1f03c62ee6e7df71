//! Client-facing record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base fields every output record carries, in output order
pub const BASE_FIELDS: [&str; 15] = [
    "date",
    "date_gmt",
    "guid",
    "id",
    "link",
    "modified",
    "modified_gmt",
    "slug",
    "status",
    "type",
    "title",
    "content",
    "author",
    "excerpt",
    "comment_status",
];

/// An ordered JSON object returned to clients
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRecord(Map<String, Value>);

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value in place
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Field names in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record id from the base projection
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    /// Content type from the base projection
    pub fn post_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}
