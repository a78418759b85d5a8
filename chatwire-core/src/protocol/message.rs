//! Conversation messages
//!
//! Each role has its own record with exactly the fields that role may carry.
//! The `role` key is written inline by every record, and decoding asserts it,
//! so [`Message`] can probe the variants in a fixed order and only ever accept
//! the one whose role literal the payload declares.

use super::content::{ContentPart, MessageContent};
use super::error::{ProtocolError, ProtocolResult};
use super::tag::{AssistantRoleTag, FunctionTag, SystemRoleTag, ToolRoleTag, UserRoleTag};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Assistant (model) response
    Assistant,
    /// Tool response answering an earlier tool call
    Tool,
}

impl Role {
    /// Wire literal for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to call
    pub name: String,

    /// JSON-encoded arguments, passed through as opaque text
    pub arguments: String,
}

/// Tool call record carried by assistant messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier, echoed back by the answering tool message
    pub id: String,

    #[serde(rename = "type")]
    tool_type: FunctionTag,

    /// Function information
    pub function: FunctionCall,
}

impl ToolCall {
    /// Create a function tool call
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_type: FunctionTag,
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// `{"role": "system", "content": ..., "name"?: ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMessage {
    role: SystemRoleTag,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl SystemMessage {
    pub fn new(content: impl Into<String>, name: Option<String>) -> Self {
        Self {
            role: SystemRoleTag,
            content: content.into(),
            name,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// `{"role": "user", "content": <string | parts>, "name"?: ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    role: UserRoleTag,
    content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl UserMessage {
    /// Create a user message; an empty part list is rejected
    pub fn new(content: impl Into<MessageContent>, name: Option<String>) -> ProtocolResult<Self> {
        let content = content.into();
        if let MessageContent::Parts(parts) = &content {
            if parts.is_empty() {
                return Err(ProtocolError::rejected(
                    Role::User,
                    "content parts must not be empty",
                ));
            }
        }
        Ok(Self {
            role: UserRoleTag,
            content,
            name,
        })
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// `{"role": "assistant", "content"?: ..., "name"?: ..., "tool_calls"?: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    role: AssistantRoleTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
}

impl AssistantMessage {
    /// Create an assistant message. Both `content` and `tool_calls` may be absent.
    pub fn new(
        content: Option<String>,
        name: Option<String>,
        tool_calls: Option<Vec<ToolCall>>,
    ) -> Self {
        if content.is_none() && tool_calls.is_none() {
            debug!("assistant message built with neither content nor tool calls");
        }
        Self {
            role: AssistantRoleTag,
            content,
            name,
            tool_calls,
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.tool_calls.as_deref()
    }
}

/// `{"role": "tool", "content": ..., "tool_call_id": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMessage {
    role: ToolRoleTag,
    content: String,
    #[serde(deserialize_with = "non_empty_string")]
    tool_call_id: String,
}

impl ToolMessage {
    /// Create a tool reply; the call id must be non-empty
    pub fn new(tool_call_id: impl Into<String>, content: impl Into<String>) -> ProtocolResult<Self> {
        let tool_call_id = tool_call_id.into();
        if tool_call_id.is_empty() {
            return Err(ProtocolError::rejected(
                Role::Tool,
                "tool_call_id must not be empty",
            ));
        }
        Ok(Self {
            role: ToolRoleTag,
            content: content.into(),
            tool_call_id,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tool_call_id(&self) -> &str {
        &self.tool_call_id
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(de::Error::invalid_length(0, &"a non-empty string"));
    }
    Ok(value)
}

/// A message in the conversation, one variant per role
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(SystemMessage),
    User(UserMessage),
    Assistant(AssistantMessage),
    Tool(ToolMessage),
}

impl Message {
    /// Role of this message
    pub fn role(&self) -> Role {
        match self {
            Message::System(_) => Role::System,
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
            Message::Tool(_) => Role::Tool,
        }
    }

    /// Content as the unified union; plain-text roles are wrapped as `Text`
    pub fn content(&self) -> Option<MessageContent> {
        match self {
            Message::System(m) => Some(MessageContent::Text(m.content.clone())),
            Message::User(m) => Some(m.content.clone()),
            Message::Assistant(m) => m.content.clone().map(MessageContent::Text),
            Message::Tool(m) => Some(MessageContent::Text(m.content.clone())),
        }
    }

    /// Plain text content, if the message has any
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::System(m) => Some(m.content()),
            Message::User(m) => m.content().as_text(),
            Message::Assistant(m) => m.content(),
            Message::Tool(m) => Some(m.content()),
        }
    }

    /// Sender name; tool messages never carry one
    pub fn name(&self) -> Option<&str> {
        match self {
            Message::System(m) => m.name(),
            Message::User(m) => m.name(),
            Message::Assistant(m) => m.name(),
            Message::Tool(_) => None,
        }
    }

    /// Id of the answered call, tool messages only
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Message::Tool(m) => Some(m.tool_call_id()),
            _ => None,
        }
    }

    /// Requested tool calls, assistant messages only
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Message::Assistant(m) => m.tool_calls(),
            _ => None,
        }
    }

    /// Build a message from a role and the loose set of optional fields.
    ///
    /// Fails when a required field is missing for the role, or when a field the
    /// role cannot carry is supplied.
    pub fn new(
        role: Role,
        content: Option<String>,
        name: Option<String>,
        tool_calls: Option<Vec<ToolCall>>,
        tool_call_id: Option<String>,
    ) -> ProtocolResult<Self> {
        let mut builder = MessageBuilder::new(role);
        builder.content = content.map(MessageContent::Text);
        builder.name = name;
        builder.tool_calls = tool_calls;
        builder.tool_call_id = tool_call_id;
        builder.build()
    }

    /// Build a vision message from content parts; only `Role::User` is accepted
    pub fn with_parts(role: Role, parts: Vec<ContentPart>) -> ProtocolResult<Self> {
        MessageBuilder::with_parts(role, parts).build()
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(SystemMessage::new(content, None))
    }

    /// Create a plain-text user message
    pub fn user(content: impl Into<String>) -> Self {
        Message::User(UserMessage {
            role: UserRoleTag,
            content: MessageContent::Text(content.into()),
            name: None,
        })
    }

    /// Create a user message from content parts
    pub fn user_parts(parts: Vec<ContentPart>) -> ProtocolResult<Self> {
        UserMessage::new(parts, None).map(Message::User)
    }

    /// Create a plain-text assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(AssistantMessage::new(Some(content.into()), None, None))
    }

    /// Create an assistant turn that only requests tool calls
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant(AssistantMessage::new(None, None, Some(tool_calls)))
    }

    /// Create a tool response message
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> ProtocolResult<Self> {
        ToolMessage::new(tool_call_id, content).map(Message::Tool)
    }
}

impl From<SystemMessage> for Message {
    fn from(message: SystemMessage) -> Self {
        Message::System(message)
    }
}

impl From<UserMessage> for Message {
    fn from(message: UserMessage) -> Self {
        Message::User(message)
    }
}

impl From<AssistantMessage> for Message {
    fn from(message: AssistantMessage) -> Self {
        Message::Assistant(message)
    }
}

impl From<ToolMessage> for Message {
    fn from(message: ToolMessage) -> Self {
        Message::Tool(message)
    }
}

impl Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Message::System(m) => m.serialize(serializer),
            Message::User(m) => m.serialize(serializer),
            Message::Assistant(m) => m.serialize(serializer),
            Message::Tool(m) => m.serialize(serializer),
        }
    }
}

const PROBE_ORDER: [Role; 4] = [Role::System, Role::User, Role::Assistant, Role::Tool];

fn probe<T>(value: &Value, wrap: fn(T) -> Message) -> Result<Message, serde_json::Error>
where
    T: DeserializeOwned,
{
    T::deserialize(value).map(wrap)
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let declared = value.get("role").and_then(Value::as_str);

        let mut role_error = None;
        for role in PROBE_ORDER {
            let attempt = match role {
                Role::System => probe(&value, Message::System),
                Role::User => probe(&value, Message::User),
                Role::Assistant => probe(&value, Message::Assistant),
                Role::Tool => probe(&value, Message::Tool),
            };
            match attempt {
                Ok(message) => return Ok(message),
                Err(err) if declared == Some(role.as_str()) => {
                    debug!(role = %role, error = %err, "message payload rejected");
                    role_error = Some((role, err));
                }
                Err(_) => {}
            }
        }

        let message = match (role_error, declared) {
            (Some((role, err)), _) => format!("{role} message has an invalid shape: {err}"),
            (None, Some(other)) => format!(
                "unknown message role `{other}`, expected one of system, user, assistant, tool"
            ),
            (None, None) => "message is missing a string `role` field".to_string(),
        };
        Err(de::Error::custom(message))
    }
}

/// Builder for constructing messages from loosely-typed inputs
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    role: Role,
    content: Option<MessageContent>,
    name: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
    tool_call_id: Option<String>,
}

impl MessageBuilder {
    /// Start a message for `role` with no fields set
    pub fn new(role: Role) -> Self {
        Self {
            role,
            content: None,
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Start a message for `role` carrying multimodal parts
    pub fn with_parts(role: Role, parts: Vec<ContentPart>) -> Self {
        let mut builder = Self::new(role);
        builder.content = Some(MessageContent::Parts(parts));
        builder
    }

    /// Set text content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(MessageContent::Text(content.into()));
        self
    }

    /// Set the name field
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a tool call
    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_calls.get_or_insert_with(Vec::new).push(tool_call);
        self
    }

    /// Set the id of the call a tool message answers
    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Build the message, rejecting field combinations the role cannot carry
    pub fn build(self) -> ProtocolResult<Message> {
        let role = self.role;
        if role != Role::Assistant && self.tool_calls.is_some() {
            return Err(ProtocolError::rejected(role, "only assistant messages carry tool_calls"));
        }
        if role != Role::Tool && self.tool_call_id.is_some() {
            return Err(ProtocolError::rejected(role, "only tool messages carry tool_call_id"));
        }

        match role {
            Role::System => {
                let content = require_text(role, self.content)?;
                Ok(SystemMessage::new(content, self.name).into())
            }
            Role::User => match self.content {
                Some(content) => Ok(UserMessage::new(content, self.name)?.into()),
                None => Err(ProtocolError::rejected(role, "content is required")),
            },
            Role::Assistant => {
                let content = match self.content {
                    Some(MessageContent::Text(text)) => Some(text),
                    Some(MessageContent::Parts(_)) => {
                        return Err(ProtocolError::rejected(
                            role,
                            "only user messages accept content parts",
                        ))
                    }
                    None => None,
                };
                Ok(AssistantMessage::new(content, self.name, self.tool_calls).into())
            }
            Role::Tool => {
                if self.name.is_some() {
                    return Err(ProtocolError::rejected(role, "tool messages do not carry a name"));
                }
                let content = require_text(role, self.content)?;
                let tool_call_id = self
                    .tool_call_id
                    .ok_or_else(|| ProtocolError::rejected(role, "tool_call_id is required"))?;
                Ok(ToolMessage::new(tool_call_id, content)?.into())
            }
        }
    }
}

fn require_text(role: Role, content: Option<MessageContent>) -> ProtocolResult<String> {
    match content {
        Some(MessageContent::Text(text)) => Ok(text),
        Some(MessageContent::Parts(_)) => Err(ProtocolError::rejected(
            role,
            "only user messages accept content parts",
        )),
        None => Err(ProtocolError::rejected(role, "content is required")),
    }
}
