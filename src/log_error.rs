//! Contract and I/O failures raised by the logging API itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    /// Key/value arguments must come in pairs
    #[error("key/value arguments must come in pairs, got {count} values")]
    OddArguments { count: usize },

    /// The destination refused a rendered line
    #[error("failed to write to {description}: {source}")]
    Sink {
        description: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("invalid color mode: {0}")]
    InvalidColorMode(String),
}

impl LogError {
    pub fn sink(description: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            description: description.into(),
            source,
        }
    }

    /// True when the error is a misuse of the API rather than a runtime failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::OddArguments { .. })
    }
}

/// Result type alias using the logging error type
pub type Result<T> = std::result::Result<T, LogError>;
