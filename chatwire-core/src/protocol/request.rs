//! Chat completion request envelope
//!
//! Numeric parameters are carried as given. Documented bounds (temperature in
//! [0, 2], penalties in [-2, 2], logit bias in [-100, 100]) are checked only by
//! [`crate::validation::RequestValidator`], never here.

use super::message::Message;
use super::tool::{ToolChoice, ToolDefinition};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier to use
    pub model: String,

    /// Messages in conversation order
    pub messages: Vec<Message>,

    /// Frequency penalty (-2.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Token id (as a string) to bias in [-100, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<BTreeMap<String, i32>>,

    /// Return log probabilities of output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,

    /// Number of most likely tokens to return per position (requires `logprobs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Number of completions to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// Presence penalty (-2.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Response format hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Seed for deterministic generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,

    /// Stream the response incrementally
    #[serde(default)]
    pub stream: bool,

    /// Streaming options, only meaningful with `stream`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Tool definitions for function calling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    /// Tool choice configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    /// End-user identifier for abuse detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Streaming options for advanced streaming control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Include usage information in the final chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_usage: Option<bool>,
}

/// Response format configuration, written as `{"type": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Plain text response
    Text,
    /// JSON mode
    JsonObject,
    /// JSON constrained by a named schema
    JsonSchema { json_schema: JsonSchemaFormat },
}

/// Named schema for [`ResponseFormat::JsonSchema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Stop sequences: one string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stop {
    Single(String),
    Multiple(Vec<String>),
}

impl Stop {
    /// All sequences, regardless of shape
    pub fn sequences(&self) -> Vec<&str> {
        match self {
            Stop::Single(s) => vec![s.as_str()],
            Stop::Multiple(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Stop {
    fn from(s: &str) -> Self {
        Stop::Single(s.to_string())
    }
}

impl From<String> for Stop {
    fn from(s: String) -> Self {
        Stop::Single(s)
    }
}

impl From<Vec<String>> for Stop {
    fn from(list: Vec<String>) -> Self {
        Stop::Multiple(list)
    }
}

impl Serialize for Stop {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Stop::Single(s) => serializer.serialize_str(s),
            Stop::Multiple(list) => list.serialize(serializer),
        }
    }
}

struct StopVisitor;

impl<'de> Visitor<'de> for StopVisitor {
    type Value = Stop;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a stop string or an array of stop strings")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Stop::Single(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Stop::Single(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<String>()? {
            list.push(item);
        }
        Ok(Stop::Multiple(list))
    }
}

impl<'de> Deserialize<'de> for Stop {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StopVisitor)
    }
}

impl ChatRequest {
    /// Create a new chat request with model and messages
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            frequency_penalty: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            max_tokens: None,
            n: None,
            presence_penalty: None,
            response_format: None,
            seed: None,
            stop: None,
            stream: false,
            stream_options: None,
            temperature: None,
            top_p: None,
            tools: None,
            tool_choice: None,
            user: None,
        }
    }

    /// Flip the streaming flag on an already-built request
    pub fn set_stream(&mut self, stream: bool) {
        self.stream = stream;
        if !stream {
            self.stream_options = None;
        }
    }

    /// Enable streaming
    pub fn with_streaming(mut self, include_usage: bool) -> Self {
        self.stream = true;
        if include_usage {
            self.stream_options = Some(StreamOptions {
                include_usage: Some(true),
            });
        }
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top_p for nucleus sampling
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the number of completions
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    /// Set frequency and presence penalties
    pub fn with_penalties(mut self, frequency: Option<f64>, presence: Option<f64>) -> Self {
        self.frequency_penalty = frequency;
        self.presence_penalty = presence;
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set stop sequences
    pub fn with_stop(mut self, stop: impl Into<Stop>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    /// Add a single stop sequence, widening a single stop into a list
    pub fn with_stop_sequence(mut self, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        self.stop = Some(match self.stop.take() {
            None => Stop::Single(sequence),
            Some(Stop::Single(first)) => Stop::Multiple(vec![first, sequence]),
            Some(Stop::Multiple(mut list)) => {
                list.push(sequence);
                Stop::Multiple(list)
            }
        });
        self
    }

    /// Bias a token id
    pub fn with_logit_bias(mut self, token_id: impl Into<String>, bias: i32) -> Self {
        self.logit_bias
            .get_or_insert_with(BTreeMap::new)
            .insert(token_id.into(), bias);
        self
    }

    /// Request log probabilities, optionally with the top alternatives
    pub fn with_logprobs(mut self, top_logprobs: Option<u32>) -> Self {
        self.logprobs = Some(true);
        self.top_logprobs = top_logprobs;
        self
    }

    /// Set the response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Set tool definitions
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set the tool choice
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Set the end-user identifier
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_request_shape() {
        let request = ChatRequest::new("gpt-4o", vec![Message::user("Hi")]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "Hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_missing_stream_defaults_to_false() {
        let request: ChatRequest =
            serde_json::from_value(json!({"model": "m", "messages": []})).unwrap();
        assert!(!request.stream);
    }

    #[test]
    fn test_response_format_is_type_object() {
        assert_eq!(
            serde_json::to_value(ResponseFormat::JsonObject).unwrap(),
            json!({"type": "json_object"})
        );
        assert_eq!(
            serde_json::to_value(ResponseFormat::Text).unwrap(),
            json!({"type": "text"})
        );
    }

    #[test]
    fn test_stop_sequence_widens() {
        let request = ChatRequest::new("m", vec![])
            .with_stop_sequence("END")
            .with_stop_sequence("STOP");
        assert_eq!(
            request.stop,
            Some(Stop::Multiple(vec!["END".to_string(), "STOP".to_string()]))
        );
    }

    #[test]
    fn test_stop_shapes() {
        assert_eq!(serde_json::from_value::<Stop>(json!("x")).unwrap(), Stop::from("x"));
        assert_eq!(
            serde_json::from_value::<Stop>(json!(["a", "b"])).unwrap().sequences(),
            vec!["a", "b"]
        );
        assert!(serde_json::from_value::<Stop>(json!(7)).is_err());
        assert!(serde_json::from_value::<Stop>(json!([1])).is_err());
    }

    #[test]
    fn test_set_stream_clears_options_when_disabled() {
        let mut request = ChatRequest::new("m", vec![]).with_streaming(true);
        assert!(request.stream_options.is_some());
        request.set_stream(false);
        assert!(!request.stream);
        assert!(request.stream_options.is_none());
    }
}
