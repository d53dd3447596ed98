//! Error types for event construction, annotation and sinks.

use thiserror::Error;

/// Main error type for reflector operations.
#[derive(Debug, Error)]
pub enum ReflectorError {
    #[error("Invalid event type: {0:?}")]
    InvalidEventType(String),

    #[error("Field index {index} out of range ({len} fields)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid value for variable {name}: {value:?}")]
    InvalidVariable { name: String, value: String },

    #[error("Sink write error: {0}")]
    SinkWrite(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ReflectorError {
    fn from(e: serde_json::Error) -> Self {
        ReflectorError::Serialization(e.to_string())
    }
}

/// Result type for reflector operations.
pub type Result<T> = std::result::Result<T, ReflectorError>;
