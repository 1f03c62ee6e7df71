//! Content records as the store hands them out

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A content record in the store's native shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: u64,

    #[serde(with = "post_datetime")]
    pub date: NaiveDateTime,

    #[serde(with = "post_datetime")]
    pub date_gmt: NaiveDateTime,

    #[serde(with = "post_datetime")]
    pub modified: NaiveDateTime,

    #[serde(with = "post_datetime")]
    pub modified_gmt: NaiveDateTime,

    #[serde(default)]
    pub guid: String,

    pub slug: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(rename = "type", default = "default_post_type")]
    pub post_type: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author: u64,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default = "default_comment_status")]
    pub comment_status: String,
}

fn default_status() -> String {
    "publish".to_string()
}

fn default_post_type() -> String {
    "post".to_string()
}

fn default_comment_status() -> String {
    "open".to_string()
}

/// A taxonomy term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub term_id: u64,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub count: u64,
}

/// A custom-field definition together with its value for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldObject {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub value: Value,
}

fn default_field_type() -> String {
    "text".to_string()
}

/// `YYYY-MM-DD HH:MM:SS` date-times
pub mod post_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
