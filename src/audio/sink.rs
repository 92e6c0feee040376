use crate::error::{Result, VoxturnError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Status signals from the audio output path.
///
/// The platform adapter forwards these to the session as they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// The current item finished playing.
    Idle,
    /// The output path is gone; nothing can be played.
    Unavailable,
}

/// Trait for the audio output path.
///
/// `play` hands one complete artifact to the sink and returns once playback
/// has started; completion arrives later as a [`SinkStatus::Idle`] signal.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start playing the artifact at `resource`.
    async fn play(&self, resource: &Path) -> Result<()>;
}

/// Mock audio sink for testing
#[derive(Debug, Clone)]
pub struct MockAudioSink {
    played: Arc<Mutex<Vec<PathBuf>>>,
    should_fail: bool,
}

impl MockAudioSink {
    /// Create a new mock sink with default settings
    pub fn new() -> Self {
        Self {
            played: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Configure the mock to fail on play
    pub fn with_play_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Resources handed to the sink so far, in play order
    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for MockAudioSink {
    async fn play(&self, resource: &Path) -> Result<()> {
        if self.should_fail {
            return Err(VoxturnError::Playback {
                message: "mock playback failure".to_string(),
            });
        }
        if let Ok(mut played) = self.played.lock() {
            played.push(resource.to_path_buf());
        }
        Ok(())
    }
}
