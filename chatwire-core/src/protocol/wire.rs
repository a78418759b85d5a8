//! JSON value encoding and decoding
//!
//! Every wire entity gets the same pair of pure functions: encode to a
//! `serde_json::Value` tree, and parse back from one. Decode failures are
//! reported as [`ProtocolError::DecodeMismatch`] tagged with the innermost
//! union that rejected its input, so a bad content part inside a request is
//! reported as a content part mismatch at `messages[i].content[j]`.

use super::content::{ContentPart, MessageContent};
use super::error::{ProtocolError, ProtocolResult, UnionKind};
use super::message::{Message, ToolCall};
use super::request::{ChatRequest, ResponseFormat, Stop};
use super::schema::{FunctionParameters, Items, Property};
use super::tool::{ToolChoice, ToolDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Encode to and decode from JSON value trees
pub trait WireFormat: Serialize + DeserializeOwned {
    /// Kind reported when decoding fails
    const KIND: UnionKind;

    /// Encode into a JSON value
    fn to_wire(&self) -> ProtocolResult<Value> {
        serde_json::to_value(self).map_err(ProtocolError::Encode)
    }

    /// Decode from a JSON value
    fn from_wire(value: Value) -> ProtocolResult<Self> {
        Self::deserialize(&value).map_err(|e| locate_mismatch::<Self>(&value, e))
    }

    /// Encode into compact JSON text
    fn to_json_string(&self) -> ProtocolResult<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decode from JSON text
    fn from_json_str(json: &str) -> ProtocolResult<Self> {
        serde_json::from_str(json).map_err(|e| match serde_json::from_str::<Value>(json) {
            Ok(value) => locate_mismatch::<Self>(&value, e),
            Err(_) => ProtocolError::mismatch(Self::KIND, e),
        })
    }

    /// Find a nested union that rejects its part of `value`
    ///
    /// Only called once decoding `value` as a whole has failed.
    fn nested_mismatch(_value: &Value) -> Option<ProtocolError> {
        None
    }
}

fn locate_mismatch<T: WireFormat>(value: &Value, err: serde_json::Error) -> ProtocolError {
    let located = T::nested_mismatch(value).unwrap_or_else(|| ProtocolError::mismatch(T::KIND, err));
    debug!(error = %located, "decode failed");
    located
}

/// Decode `value` as `T`, returning the located failure if it does not fit
fn check<T: WireFormat>(value: &Value, field: &str) -> Option<ProtocolError> {
    let err = T::deserialize(value).err()?;
    let inner = T::nested_mismatch(value).unwrap_or_else(|| ProtocolError::mismatch(T::KIND, err));
    Some(inner.within(field))
}

/// Check every element of the array under `key`
fn check_each<T: WireFormat>(object: &Value, key: &str) -> Option<ProtocolError> {
    object
        .get(key)?
        .as_array()?
        .iter()
        .enumerate()
        .find_map(|(i, element)| check::<T>(element, &format!("{key}[{i}]")))
}

/// Check the field under `key` unless it is absent or null
fn check_field<T: WireFormat>(object: &Value, key: &str) -> Option<ProtocolError> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(field) => check::<T>(field, key),
    }
}

macro_rules! wire_format {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl WireFormat for $ty {
                const KIND: UnionKind = UnionKind::$kind;
            }
        )*
    };
}

wire_format! {
    ContentPart => ContentPart,
    ToolCall => ToolCall,
    ToolChoice => ToolChoice,
    ToolDefinition => ToolDefinition,
    Stop => Stop,
    ResponseFormat => ResponseFormat,
    FunctionParameters => Schema,
    Property => Schema,
    Items => Schema,
}

impl WireFormat for MessageContent {
    const KIND: UnionKind = UnionKind::MessageContent;

    fn nested_mismatch(value: &Value) -> Option<ProtocolError> {
        let parts = value.as_array()?;
        parts
            .iter()
            .enumerate()
            .find_map(|(i, part)| check::<ContentPart>(part, &format!("[{i}]")))
    }
}

impl WireFormat for Message {
    const KIND: UnionKind = UnionKind::Message;

    fn nested_mismatch(value: &Value) -> Option<ProtocolError> {
        match value.get("role")?.as_str()? {
            "user" => check_field::<MessageContent>(value, "content"),
            "assistant" => check_each::<ToolCall>(value, "tool_calls"),
            _ => None,
        }
    }
}

impl WireFormat for ChatRequest {
    const KIND: UnionKind = UnionKind::Request;

    fn nested_mismatch(value: &Value) -> Option<ProtocolError> {
        check_each::<Message>(value, "messages")
            .or_else(|| check_each::<ToolDefinition>(value, "tools"))
            .or_else(|| check_field::<ToolChoice>(value, "tool_choice"))
            .or_else(|| check_field::<Stop>(value, "stop"))
            .or_else(|| check_field::<ResponseFormat>(value, "response_format"))
    }
}
