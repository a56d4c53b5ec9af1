//! Error types for October
//!
//! Centralized error handling using thiserror.

use std::fmt;

use thiserror::Error;

/// A single fatal message raised against malformed annotation usage.
///
/// The element is the qualified name of the offending class, when one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingError {
    pub element: Option<String>,
    pub message: String,
}

impl ProcessingError {
    /// Create an error bound to an element
    pub fn new(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            element: Some(element.into()),
            message: message.into(),
        }
    }

    /// Create an error with no element attached
    pub fn detached(message: impl Into<String>) -> Self {
        Self {
            element: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProcessingError {}

/// Every rule violation accumulated for one element by the annotation validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub element: String,
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(element: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            element: element.into(),
            messages,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s) on {}: {}", self.messages.len(), self.element, self.messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Main error type for October
#[derive(Error, Debug)]
pub enum OctoberError {
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Emission error: {0}")]
    Emit(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for October operations
pub type Result<T> = std::result::Result<T, OctoberError>;

impl OctoberError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            OctoberError::Io(e) => format!("File operation failed: {}", e),
            OctoberError::Config(msg) => format!("Configuration error: {}", msg),
            OctoberError::Emit(msg) => format!("Could not emit generated sources: {}", msg),
            _ => self.to_string(),
        }
    }
}
