//! Caller-side request validation
//!
//! The protocol types accept any numeric value and any function name. This
//! module checks the bounds the API documents, for callers that want to fail
//! before a request leaves the process.

mod error;

pub use error::{ValidationError, ValidationErrorKind};

use crate::protocol::{ChatRequest, Message, ToolChoice};
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

/// Largest accepted `top_logprobs`
pub const MAX_TOP_LOGPROBS: u32 = 20;

/// Check that `value` lies in `[min, max]`
pub fn check_range(field_path: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::out_of_range(
            field_path,
            format!("{value} is not within [{min}, {max}]"),
        ));
    }
    Ok(())
}

/// Request validator for documented API bounds
pub struct RequestValidator {
    /// Pattern tool function names must match
    function_name_pattern: Regex,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            function_name_pattern: Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").unwrap(),
        }
    }

    /// Validate a request, returning the first violation found
    pub fn validate(&self, request: &ChatRequest) -> Result<(), ValidationError> {
        self.validate_envelope(request)?;
        self.validate_sampling(request)?;
        self.validate_tools(request)?;
        self.inspect_conversation(request);
        Ok(())
    }

    /// Whether `name` is an acceptable function name
    pub fn is_valid_function_name(&self, name: &str) -> bool {
        self.function_name_pattern.is_match(name)
    }

    fn validate_envelope(&self, request: &ChatRequest) -> Result<(), ValidationError> {
        if request.model.trim().is_empty() {
            return Err(ValidationError::required("model"));
        }
        if request.messages.is_empty() {
            return Err(ValidationError::required("messages")
                .with_context("a request needs at least one message"));
        }
        if request.stream_options.is_some() && !request.stream {
            return Err(ValidationError::incompatible(
                "stream_options",
                "stream_options requires stream = true",
            ));
        }
        Ok(())
    }

    fn validate_sampling(&self, request: &ChatRequest) -> Result<(), ValidationError> {
        if let Some(temperature) = request.temperature {
            check_range("temperature", temperature, 0.0, 2.0)?;
        }
        if let Some(top_p) = request.top_p {
            check_range("top_p", top_p, 0.0, 1.0)?;
        }
        if let Some(penalty) = request.frequency_penalty {
            check_range("frequency_penalty", penalty, -2.0, 2.0)?;
        }
        if let Some(penalty) = request.presence_penalty {
            check_range("presence_penalty", penalty, -2.0, 2.0)?;
        }
        if let Some(bias) = &request.logit_bias {
            for (token, value) in bias {
                if !(-100..=100).contains(value) {
                    return Err(ValidationError::out_of_range(
                        format!("logit_bias.{token}"),
                        format!("{value} is not within [-100, 100]"),
                    ));
                }
            }
        }
        if let Some(top) = request.top_logprobs {
            if top > MAX_TOP_LOGPROBS {
                return Err(ValidationError::out_of_range(
                    "top_logprobs",
                    format!("{top} exceeds {MAX_TOP_LOGPROBS}"),
                ));
            }
            if request.logprobs != Some(true) {
                return Err(ValidationError::incompatible(
                    "top_logprobs",
                    "top_logprobs requires logprobs = true",
                ));
            }
        }
        if request.n == Some(0) {
            return Err(ValidationError::out_of_range("n", "must be at least 1"));
        }
        if request.max_tokens == Some(0) {
            return Err(ValidationError::out_of_range("max_tokens", "must be at least 1"));
        }
        Ok(())
    }

    fn validate_tools(&self, request: &ChatRequest) -> Result<(), ValidationError> {
        let mut defined = HashSet::new();
        for (i, tool) in request.tools.iter().flatten().enumerate() {
            let name = tool.name();
            if !self.is_valid_function_name(name) {
                return Err(ValidationError::invalid_format(
                    format!("tools[{i}].function.name"),
                    format!("'{name}' must match ^[a-zA-Z0-9_-]{{1,64}}$"),
                ));
            }
            if !defined.insert(name) {
                return Err(ValidationError::new(
                    format!("tools[{i}].function.name"),
                    ValidationErrorKind::DuplicateValue {
                        value: name.to_string(),
                    },
                ));
            }
        }

        if let Some(ToolChoice::Function(name)) = &request.tool_choice {
            if !defined.contains(name.as_str()) {
                return Err(ValidationError::incompatible(
                    "tool_choice",
                    format!("function '{name}' is not among the defined tools"),
                ));
            }
        }
        Ok(())
    }

    /// Log permitted but suspicious conversation shapes
    fn inspect_conversation(&self, request: &ChatRequest) {
        let mut issued = HashSet::new();
        for (i, message) in request.messages.iter().enumerate() {
            match message {
                Message::Assistant(m) => {
                    if m.content().is_none() && m.tool_calls().is_none() {
                        warn!(index = i, "assistant message has neither content nor tool calls");
                    }
                    issued.extend(m.tool_calls().into_iter().flatten().map(|c| c.id.as_str()));
                }
                Message::Tool(m) if !issued.contains(m.tool_call_id()) => {
                    warn!(
                        index = i,
                        tool_call_id = m.tool_call_id(),
                        "tool message answers a call id no earlier assistant message issued"
                    );
                }
                _ => {}
            }
        }
    }
}
