//! Protocol error types

use super::message::Role;
use std::fmt;
use thiserror::Error;

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// The union (or record) a decode was attempting when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionKind {
    /// Role dispatch over the four message variants
    Message,
    /// String-or-parts content of a user message
    MessageContent,
    /// Text or image part
    ContentPart,
    /// Assistant tool call record
    ToolCall,
    /// `"none"` / `"auto"` / named function
    ToolChoice,
    /// Tool definition envelope
    ToolDefinition,
    /// Single stop string or list of strings
    Stop,
    /// `{"type": ...}` response format
    ResponseFormat,
    /// Function parameter schema node
    Schema,
    /// Top-level chat request
    Request,
}

impl UnionKind {
    /// Human-readable name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::MessageContent => "message content",
            Self::ContentPart => "content part",
            Self::ToolCall => "tool call",
            Self::ToolChoice => "tool choice",
            Self::ToolDefinition => "tool definition",
            Self::Stop => "stop",
            Self::ResponseFormat => "response format",
            Self::Schema => "parameter schema",
            Self::Request => "chat request",
        }
    }
}

impl fmt::Display for UnionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or (de)serializing request payloads
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A constructor was given a field combination its role cannot carry
    #[error("cannot build {role} message: {reason}")]
    ConstructionRejected { role: Role, reason: String },

    /// The input JSON matched none of the shapes of a union
    ///
    /// `union` is the innermost union that rejected its input and `path`
    /// locates it inside the decoded value (empty when it is the value itself).
    #[error("{union} did not match any accepted shape{}: {message}", location(.path))]
    DecodeMismatch {
        union: UnionKind,
        path: String,
        message: String,
    },

    /// Serialization failed
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    pub(crate) fn rejected(role: Role, reason: impl Into<String>) -> Self {
        Self::ConstructionRejected {
            role,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(union: UnionKind, message: impl fmt::Display) -> Self {
        Self::DecodeMismatch {
            union,
            path: String::new(),
            message: message.to_string(),
        }
    }

    /// Prefix the location of a decode failure with the enclosing field
    pub(crate) fn within(self, field: &str) -> Self {
        match self {
            Self::DecodeMismatch {
                union,
                path,
                message,
            } => {
                let path = if path.is_empty() {
                    field.to_string()
                } else if path.starts_with('[') {
                    format!("{field}{path}")
                } else {
                    format!("{field}.{path}")
                };
                Self::DecodeMismatch {
                    union,
                    path,
                    message,
                }
            }
            other => other,
        }
    }

    /// The union a decode failure belongs to, if this is one
    pub fn union(&self) -> Option<UnionKind> {
        match self {
            Self::DecodeMismatch { union, .. } => Some(*union),
            _ => None,
        }
    }

    /// Where in the decoded value the failing union sits, e.g. `messages[2].content`
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::DecodeMismatch { path, .. } if !path.is_empty() => Some(path.as_str()),
            _ => None,
        }
    }
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{path}`")
    }
}
