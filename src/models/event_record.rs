use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Capture timestamps are local wall-clock time without an offset.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Serializable value of a normalized field. Never a live object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

/// One captured event: its normalized fields plus the signal and capture time.
///
/// Written to disk as a single flat JSON object, `sequence` and `time`
/// alongside the payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub fields: Fields,
    pub sequence: String,
    pub time: String,
}

impl EventRecord {
    pub fn new(sequence: impl Into<String>, time: impl Into<String>, mut fields: Fields) -> Self {
        // The record's own keys win over payload attributes of the same name.
        fields.remove("sequence");
        fields.remove("time");

        Self {
            fields,
            sequence: sequence.into(),
            time: time.into(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

pub fn format_time(at: NaiveDateTime) -> String {
    at.format(TIME_FORMAT).to_string()
}

pub fn capture_time() -> String {
    format_time(Local::now().naive_local())
}
