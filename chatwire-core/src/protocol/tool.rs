//! Tool definitions and tool selection

use super::schema::FunctionParameters;
use super::tag::FunctionTag;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Tool definition for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    tool_type: FunctionTag,

    /// Function definition
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    /// Define a callable function.
    ///
    /// `name` should match `^[a-zA-Z0-9_-]{1,64}$`; this is not checked here
    /// (see [`crate::validation::RequestValidator`]).
    pub fn function(
        name: impl Into<String>,
        description: Option<String>,
        parameters: Option<FunctionParameters>,
    ) -> Self {
        Self {
            tool_type: FunctionTag,
            function: FunctionDefinition {
                name: name.into(),
                description,
                parameters,
            },
        }
    }

    /// Name of the defined function
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,

    /// Function description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameter schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<FunctionParameters>,
}

/// Which tool, if any, the model should call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolChoice {
    /// `"none"`: never call a tool
    None,
    /// `"auto"`: the model decides
    Auto,
    /// `{"type": "function", "function": {"name": ...}}`
    Function(String),
}

impl ToolChoice {
    /// Force a call to the named function
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function(name.into())
    }
}

#[derive(Serialize, Deserialize)]
struct NamedChoice {
    #[serde(rename = "type")]
    tool_type: FunctionTag,
    function: FunctionName,
}

#[derive(Serialize, Deserialize)]
struct FunctionName {
    name: String,
}

impl Serialize for ToolChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ToolChoice::None => serializer.serialize_str("none"),
            ToolChoice::Auto => serializer.serialize_str("auto"),
            ToolChoice::Function(name) => NamedChoice {
                tool_type: FunctionTag,
                function: FunctionName { name: name.clone() },
            }
            .serialize(serializer),
        }
    }
}

struct ToolChoiceVisitor;

impl<'de> Visitor<'de> for ToolChoiceVisitor {
    type Value = ToolChoice;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#""none", "auto" or {"type": "function", "function": {"name": ...}}"#)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match value {
            "none" => Ok(ToolChoice::None),
            "auto" => Ok(ToolChoice::Auto),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let named = NamedChoice::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(ToolChoice::Function(named.function.name))
    }
}

impl<'de> Deserialize<'de> for ToolChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ToolChoiceVisitor)
    }
}
