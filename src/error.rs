//! Error types for the ALRAGE evaluator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, AlrageError>;

/// Errors that can occur in the evaluator.
#[derive(Error, Debug)]
pub enum AlrageError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested task is not registered.
    #[error("Unknown task '{0}'")]
    UnknownTask(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl AlrageError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for AlrageError {
    fn from(err: reqwest::Error) -> Self {
        AlrageError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for AlrageError {
    fn from(err: serde_json::Error) -> Self {
        AlrageError::LlmParse(err.to_string())
    }
}
