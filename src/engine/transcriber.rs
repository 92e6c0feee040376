use crate::error::{Result, VoxturnError};
use crate::pipeline::types::CaptureArtifact;
use async_trait::async_trait;

/// Trait for speech-to-text conversion of a finished capture.
///
/// This trait allows swapping implementations (real engine vs mock). The
/// engine is a black box: it receives a finalized artifact and returns the
/// spoken text, or a transcription error.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a capture artifact to text.
    ///
    /// # Arguments
    /// * `artifact` - The finalized recording of one utterance
    ///
    /// # Returns
    /// Transcribed text or error
    async fn convert(&self, artifact: &CaptureArtifact) -> Result<String>;
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    response: String,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on convert
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn convert(&self, _artifact: &CaptureArtifact) -> Result<String> {
        if self.should_fail {
            Err(VoxturnError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
