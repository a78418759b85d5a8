//! Configuration module
//!
//! Request defaults can be kept in a YAML or JSON file. `${VAR}` placeholders
//! are resolved from the environment before parsing.

mod defaults;
mod env;
mod error;

pub use defaults::RequestDefaults;
pub use env::{extract_env_vars, interpolate_env_vars};
pub use error::{ConfigError, ConfigResult};

use std::fs;
use std::path::Path;
use tracing::debug;

fn read_config(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn with_path(err: ConfigError, path: &Path) -> ConfigError {
    match err {
        ConfigError::Malformed {
            line,
            column,
            message,
            ..
        } => ConfigError::Malformed {
            origin: path.display().to_string(),
            line,
            column,
            message,
        },
        other => other,
    }
}

/// Load request defaults from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<RequestDefaults> {
    let path = path.as_ref();
    let content = read_config(path)?;
    let defaults = RequestDefaults::from_yaml_str(&content).map_err(|e| with_path(e, path))?;
    debug!(path = %path.display(), "loaded request defaults");
    Ok(defaults)
}

/// Load request defaults from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<RequestDefaults> {
    let path = path.as_ref();
    let content = read_config(path)?;
    let defaults = RequestDefaults::from_json_str(&content).map_err(|e| with_path(e, path))?;
    debug!(path = %path.display(), "loaded request defaults");
    Ok(defaults)
}
