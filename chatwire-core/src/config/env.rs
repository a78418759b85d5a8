//! Environment variable interpolation for configuration

use super::error::{ConfigError, ConfigResult};
use regex::{Captures, Regex};
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap())
}

/// Interpolate `${VAR}` placeholders in a configuration string
///
/// Fails listing every referenced variable that is unset, in order of first
/// appearance.
pub fn interpolate_env_vars(content: &str) -> ConfigResult<String> {
    let mut unset = Vec::new();
    for var in extract_env_vars(content) {
        if env::var(&var).is_err() && !unset.contains(&var) {
            unset.push(var);
        }
    }
    if !unset.is_empty() {
        return Err(ConfigError::UnsetVariables { vars: unset });
    }

    let result = env_var_pattern().replace_all(content, |cap: &Captures| {
        env::var(&cap[1]).unwrap_or_default()
    });
    Ok(result.into_owned())
}

/// Names of all referenced environment variables, duplicates included
pub fn extract_env_vars(text: &str) -> Vec<String> {
    env_var_pattern()
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}
