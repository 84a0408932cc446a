//! Error types for jscallgraph-core
//!
//! Only configuration errors and unusable input are errors. Budget exhaustion and
//! unresolved call targets are reported on the analysis result instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for call-graph construction
#[derive(Debug, Error)]
pub enum CallGraphError {
    /// IO error while reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IR document could not be parsed
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// IR document parsed but is not a well-formed program
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// Invalid or conflicting analysis options
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CallGraphError {
    /// Create an invalid-program error
    pub fn invalid_program(msg: impl Into<String>) -> Self {
        CallGraphError::InvalidProgram(msg.into())
    }

    /// Whether the error stems from the configuration surface
    pub fn is_config_error(&self) -> bool {
        matches!(self, CallGraphError::Config(_))
    }
}

/// Result type alias for call-graph operations
pub type Result<T> = std::result::Result<T, CallGraphError>;
