//! Decoding of the provider's tagged-pair replies.
//!
//! Every endpoint answers with a JSON array whose first element is a string
//! tag and whose second is the payload, e.g. `["Ok", {...}]`. The same shape
//! shows up nested inside SERP items (`["organic", {...}]`, `["Some", {...}]`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Tag of a successful reply.
pub const OK_TAG: &str = "Ok";

/// Why a reply did not decode.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("expected a two-element array, got {0}")]
    NotAPair(String),

    #[error("expected tag {expected:?}, got {actual:?}")]
    Tag { expected: &'static str, actual: Option<String> },

    #[error("payload did not decode: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A `[tag, payload]` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    /// The tag, when the first element is a string.
    pub tag: Option<String>,
    pub payload: Value,
}

impl Tagged {
    /// Decode an array of exactly two elements.
    pub fn pair(value: Value) -> Result<Self, EnvelopeError> {
        match value {
            Value::Array(items) if items.len() == 2 => Ok(Self::from_items(items)),
            other => Err(EnvelopeError::NotAPair(describe(&other))),
        }
    }

    /// Decode an array of at least two elements, ignoring any extras.
    pub fn leading(value: Value) -> Result<Self, EnvelopeError> {
        match value {
            Value::Array(mut items) if items.len() >= 2 => {
                items.truncate(2);
                Ok(Self::from_items(items))
            }
            other => Err(EnvelopeError::NotAPair(describe(&other))),
        }
    }

    fn from_items(items: Vec<Value>) -> Self {
        let mut items = items.into_iter();
        let tag = match items.next() {
            Some(Value::String(tag)) => Some(tag),
            _ => None,
        };
        Self { tag, payload: items.next().unwrap_or(Value::Null) }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    /// Decode the payload, requiring the pair to carry `tag`.
    pub fn expect<T: DeserializeOwned>(self, tag: &'static str) -> Result<T, EnvelopeError> {
        if !self.has_tag(tag) {
            return Err(EnvelopeError::Tag { expected: tag, actual: self.tag });
        }
        self.into_payload()
    }

    /// Decode the payload of an `"Ok"` reply.
    pub fn into_ok<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        self.expect(OK_TAG)
    }

    /// Decode the payload whatever the tag says.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        Ok(serde_json::from_value(self.payload)?)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(_) => "object".into(),
        Value::String(_) => "string".into(),
        Value::Number(_) => "number".into(),
        Value::Bool(_) => "bool".into(),
        Value::Null => "null".into(),
    }
}

/// Read a field as `T`, falling back to `T::default()` when it is null or of
/// another type. One off-type field never sinks the rest of the record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A number as the provider sent it (integer or float), zero for anything else.
pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n),
        _ => Ok(zero()),
    }
}

/// A list passed through untouched. Missing or null reads as `[]`.
pub(crate) fn list_or_empty<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(empty_list()),
        other => Ok(other),
    }
}

pub(crate) fn empty_list() -> Value {
    Value::Array(Vec::new())
}

pub(crate) fn zero() -> Number {
    Number::from(0)
}
