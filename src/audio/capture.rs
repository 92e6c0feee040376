use crate::defaults;
use crate::error::{Result, VoxturnError};
use crate::pipeline::types::ParticipantId;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Policy ending a capture stream after trailing silence.
///
/// The platform applies the policy: once the participant has been silent for
/// the configured duration, the stream terminates on its own.
#[derive(Debug, Clone)]
pub struct EndOfSpeechPolicy {
    /// Trailing silence in milliseconds after which the stream ends.
    pub trailing_silence_ms: u64,
}

impl Default for EndOfSpeechPolicy {
    fn default() -> Self {
        Self {
            trailing_silence_ms: defaults::TRAILING_SILENCE_MS,
        }
    }
}

/// Speaking-activity signals emitted by the platform for a voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSignal {
    /// The participant began speaking.
    Started(ParticipantId),
    /// The participant stopped speaking.
    Ended(ParticipantId),
}

/// Raw audio chunks for a single utterance.
///
/// The stream ends (yields `None`) when the platform's end-of-speech policy
/// terminates it.
#[derive(Debug)]
pub struct CaptureStream {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl CaptureStream {
    /// Creates a stream and the sender half the platform adapter feeds.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }

    /// Next chunk of captured audio; `None` once the stream has ended.
    pub async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}

/// Trait for the platform's capture feed.
///
/// This trait allows swapping implementations (live platform vs mock).
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Subscribes to one participant's capture feed for a single utterance.
    ///
    /// # Arguments
    /// * `participant` - Whose audio to capture
    /// * `policy` - End-of-speech policy terminating the stream
    async fn subscribe(
        &self,
        participant: &ParticipantId,
        policy: EndOfSpeechPolicy,
    ) -> Result<CaptureStream>;
}

/// Mock capture source for testing
#[derive(Debug, Clone)]
pub struct MockCaptureSource {
    chunks: Vec<Vec<u8>>,
    should_fail: bool,
}

impl MockCaptureSource {
    /// Create a new mock capture source with default settings
    pub fn new() -> Self {
        Self {
            chunks: vec![vec![0u8; 160]],
            should_fail: false,
        }
    }

    /// Configure the mock to yield specific chunks before ending
    pub fn with_chunks(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Configure the mock to fail on subscribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureSource for MockCaptureSource {
    async fn subscribe(
        &self,
        _participant: &ParticipantId,
        _policy: EndOfSpeechPolicy,
    ) -> Result<CaptureStream> {
        if self.should_fail {
            return Err(VoxturnError::Capture {
                message: "mock capture failure".to_string(),
            });
        }

        let capacity = (self.chunks.len() + 1).max(defaults::CAPTURE_BUFFER);
        let (tx, stream) = CaptureStream::channel(capacity);
        for chunk in &self.chunks {
            let _ = tx.try_send(chunk.clone());
        }
        // Dropping the sender ends the stream, as the policy would.
        Ok(stream)
    }
}
