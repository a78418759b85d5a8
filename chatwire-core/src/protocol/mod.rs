//! Protocol module for chat completion request payloads
//!
//! This module defines the outbound request model and its wire encoding.
//! These structures are designed to be:
//! - Wire-exact: every key, literal tag and omission rule matches the API
//! - Valid by construction: required fields cannot be left unset
//! - Self-describing on decode: union shapes are probed, not looked up

pub mod content;
pub mod error;
pub mod message;
pub mod request;
pub mod schema;
pub mod tag;
pub mod tool;
pub mod wire;

pub use content::{ContentPart, ImageDetail, ImageSource, ImageUrl, MessageContent};
pub use error::{ProtocolError, ProtocolResult, UnionKind};
pub use message::{
    AssistantMessage, FunctionCall, Message, MessageBuilder, Role, SystemMessage, ToolCall,
    ToolMessage, UserMessage,
};
pub use request::{ChatRequest, JsonSchemaFormat, ResponseFormat, Stop, StreamOptions};
pub use schema::{FunctionParameters, Items, JsonType, Property};
pub use tool::{FunctionDefinition, ToolChoice, ToolDefinition};
pub use wire::WireFormat;
