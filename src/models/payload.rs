use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::host::UiRef;

/// Who constructed the event object the host hands to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    /// Low-level input event built by the UI framework (pointer, keys, focus).
    Native,
    /// Event object raised by the application itself (commands, file ops, views).
    Application,
}

/// One attribute value of a raw event, as the host exposes it.
///
/// The set of categories is closed; anything the host cannot map onto a
/// richer variant arrives as [`PayloadValue::Opaque`] carrying the host's own
/// description of the value.
#[derive(Debug, Clone)]
pub enum PayloadValue {
    Object(UiRef),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<PayloadValue>),
    Map(Vec<(String, PayloadValue)>),
    Opaque(String),
}

impl PayloadValue {
    pub fn as_object(&self) -> Option<&UiRef> {
        match self {
            PayloadValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Textual rendering used when a value cannot be stored as a scalar.
    /// Total over every variant and never touches anything but the value.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out);
        out
    }

    fn describe_into(&self, out: &mut String) {
        match self {
            PayloadValue::Object(object) => {
                let _ = write!(out, "<{}>", object.class_name());
            }
            PayloadValue::Str(value) => {
                let _ = write!(out, "{value:?}");
            }
            PayloadValue::Int(value) => {
                let _ = write!(out, "{value}");
            }
            PayloadValue::Float(value) => {
                let _ = write!(out, "{value}");
            }
            PayloadValue::Bool(value) => {
                let _ = write!(out, "{value}");
            }
            PayloadValue::None => out.push_str("none"),
            PayloadValue::List(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    item.describe_into(out);
                }
                out.push(']');
            }
            PayloadValue::Map(entries) => {
                out.push('{');
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key:?}: ");
                    value.describe_into(out);
                }
                out.push('}');
            }
            PayloadValue::Opaque(description) => out.push_str(description),
        }
    }
}

impl From<UiRef> for PayloadValue {
    fn from(value: UiRef) -> Self {
        PayloadValue::Object(value)
    }
}

impl From<&UiRef> for PayloadValue {
    fn from(value: &UiRef) -> Self {
        PayloadValue::Object(value.clone())
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Str(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Str(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Int(value)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        PayloadValue::Int(value.into())
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        PayloadValue::Float(value)
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

/// Event object delivered by the host: its origin plus named attributes.
#[derive(Debug, Clone)]
pub struct RawEvent {
    origin: EventOrigin,
    attributes: BTreeMap<String, PayloadValue>,
}

impl RawEvent {
    pub fn new(origin: EventOrigin) -> Self {
        Self {
            origin,
            attributes: BTreeMap::new(),
        }
    }

    pub fn native() -> Self {
        Self::new(EventOrigin::Native)
    }

    pub fn application() -> Self {
        Self::new(EventOrigin::Application)
    }

    /// Builder-style attribute setter; a repeated name replaces the earlier value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PayloadValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn origin(&self) -> EventOrigin {
        self.origin
    }

    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}
