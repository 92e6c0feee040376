//! Error types for voxturn.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxturnError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture errors
    #[error("Voice capture failed: {message}")]
    Capture { message: String },

    // Engine errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Conversation engine failed: {message}")]
    Conversation { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Playback errors
    #[error("Audio playback failed: {message}")]
    Playback { message: String },

    // Presentation errors
    #[error("Presentation update failed: {message}")]
    Notify { message: String },

    // Session errors
    #[error("Session already active for participant {participant}")]
    SessionActive { participant: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxturnError>;
