//! Errors raised while loading request defaults

use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a defaults file into [`super::RequestDefaults`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The defaults file could not be read
    #[error("cannot read request defaults from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not a well-formed defaults document
    #[error("malformed request defaults in {origin}{}: {message}", position(.line, .column))]
    Malformed {
        /// File path, or `<inline>` for text parsed directly
        origin: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// `${VAR}` placeholders naming variables the environment does not define
    #[error("request defaults reference unset environment variables: {}", .vars.join(", "))]
    UnsetVariables { vars: Vec<String> },

    /// A default value lies outside the documented API bounds
    #[error("request defaults rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// A request was built from defaults that name no model
    #[error("request defaults do not name a model")]
    NoModel,
}

fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
