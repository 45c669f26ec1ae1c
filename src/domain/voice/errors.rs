//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Missing filename")]
    MissingFileName,

    #[error("Missing content type")]
    MissingContentType,

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid voice name: {0}")]
    InvalidName(String),
}
