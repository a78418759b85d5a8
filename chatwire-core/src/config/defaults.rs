//! Request defaults

use super::env;
use super::error::{ConfigError, ConfigResult};
use crate::protocol::{ChatRequest, Message, Stop};
use crate::validation::{check_range, ValidationError};
use serde::{Deserialize, Serialize};

/// Default values applied to requests built by the caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDefaults {
    /// Model identifier used when a request names none
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub top_p: Option<f64>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub seed: Option<i64>,

    #[serde(default)]
    pub stop: Option<Stop>,

    /// End-user identifier
    #[serde(default)]
    pub user: Option<String>,

    /// Streaming flag for requests built from these defaults
    #[serde(default)]
    pub stream: Option<bool>,
}

impl RequestDefaults {
    /// Parse defaults from YAML text, interpolating `${VAR}` placeholders first
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let interpolated = env::interpolate_env_vars(content)?;
        let defaults: Self =
            serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Malformed {
                origin: "<inline>".to_string(),
                line: e.location().map(|l| l.line()),
                column: e.location().map(|l| l.column()),
                message: e.to_string(),
            })?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Parse defaults from JSON text, interpolating `${VAR}` placeholders first
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let interpolated = env::interpolate_env_vars(content)?;
        let defaults: Self =
            serde_json::from_str(&interpolated).map_err(|e| ConfigError::Malformed {
                origin: "<inline>".to_string(),
                line: Some(e.line()),
                column: Some(e.column()),
                message: e.to_string(),
            })?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Check the values against the documented API bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(ValidationError::required("model")
                    .with_context("model may be omitted but not empty"));
            }
        }
        if let Some(temperature) = self.temperature {
            check_range("temperature", temperature, 0.0, 2.0)?;
        }
        if let Some(top_p) = self.top_p {
            check_range("top_p", top_p, 0.0, 1.0)?;
        }
        if self.max_tokens == Some(0) {
            return Err(ValidationError::out_of_range("max_tokens", "must be at least 1"));
        }
        Ok(())
    }

    /// Fill every field `request` leaves unset. The streaming flag is left alone.
    pub fn apply(&self, request: &mut ChatRequest) {
        if request.model.is_empty() {
            if let Some(model) = &self.model {
                request.model = model.clone();
            }
        }
        if request.temperature.is_none() {
            request.temperature = self.temperature;
        }
        if request.top_p.is_none() {
            request.top_p = self.top_p;
        }
        if request.max_tokens.is_none() {
            request.max_tokens = self.max_tokens;
        }
        if request.seed.is_none() {
            request.seed = self.seed;
        }
        if request.stop.is_none() {
            request.stop = self.stop.clone();
        }
        if request.user.is_none() {
            request.user = self.user.clone();
        }
    }

    /// Build a request for `messages` from these defaults
    pub fn build_request(&self, messages: Vec<Message>) -> ConfigResult<ChatRequest> {
        let model = self.model.clone().ok_or(ConfigError::NoModel)?;
        let mut request = ChatRequest::new(model, messages);
        self.apply(&mut request);
        request.set_stream(self.stream.unwrap_or(false));
        Ok(request)
    }
}
