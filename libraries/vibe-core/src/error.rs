/// Core error types for Vibe Tuner
use thiserror::Error;

/// Result type alias using `VibeError`
pub type Result<T> = std::result::Result<T, VibeError>;

/// Domain validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VibeError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Emotion label not present in the reference table
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    /// Confidence outside the closed unit interval
    #[error("Confidence must be between 0 and 1, got {0}")]
    ConfidenceOutOfRange(f64),
}

impl VibeError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
