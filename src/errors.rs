//! Error types for rapid_pacsum
//!
//! This module defines the error types used throughout the library.
//! Failures raised by external collaborators (embedders, similarity
//! providers, quality metrics) travel through the same enum unchanged.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PacSumError>;

/// Main error type for rapid_pacsum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PacSumError {
    /// Malformed input: non-square matrix, zero `extract_num`, mismatched lengths
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The embedding or similarity collaborator failed
    #[error("Similarity provider error: {message}")]
    Provider { message: String },

    /// The quality metric failed or did not report the ranking key
    #[error("Quality metric error: {message}")]
    Metric { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Worker pool could not be built
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl PacSumError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a metric error
    pub fn metric(message: impl Into<String>) -> Self {
        Self::Metric {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for PacSumError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
