use crate::error::{Result, VoxturnError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Trait for text-to-speech conversion of one response chunk.
///
/// The engine is a black box: it receives chunk text and returns the path of
/// a complete playable audio file, or a synthesis error.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize one response chunk into a playable audio file.
    ///
    /// # Returns
    /// Path of the synthesized artifact, or error
    async fn convert(&self, text: &str) -> Result<PathBuf>;
}

/// Mock synthesizer for testing.
///
/// Writes a small placeholder file per call so artifact cleanup can be
/// observed on the filesystem.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    dir: PathBuf,
    counter: Arc<AtomicU64>,
    should_fail: bool,
    fail_on_call: Option<u64>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSynthesizer {
    /// Create a mock synthesizer writing artifacts into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: Arc::new(AtomicU64::new(0)),
            should_fail: false,
            fail_on_call: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to fail on every convert
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to fail on the nth convert call (0-based)
    pub fn with_failure_on(mut self, call: u64) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Chunk texts synthesized so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn convert(&self, text: &str) -> Result<PathBuf> {
        let call = self.counter.fetch_add(1, Ordering::SeqCst);

        if self.should_fail || self.fail_on_call == Some(call) {
            return Err(VoxturnError::Synthesis {
                message: "mock synthesis failure".to_string(),
            });
        }

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }

        let path = self.dir.join(format!("segment-{:06}.wav", call));
        std::fs::write(&path, text.as_bytes())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_synthesizer_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = MockSynthesizer::new(dir.path());

        let path = synthesizer.convert("hello").await.unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert_eq!(synthesizer.calls(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_mock_synthesizer_artifacts_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = MockSynthesizer::new(dir.path());

        let first = synthesizer.convert("one").await.unwrap();
        let second = synthesizer.convert("two").await.unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[tokio::test]
    async fn test_mock_synthesizer_failure() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = MockSynthesizer::new(dir.path()).with_failure();

        let result = synthesizer.convert("hello").await;

        assert!(result.is_err());
        match result {
            Err(VoxturnError::Synthesis { message }) => {
                assert_eq!(message, "mock synthesis failure");
            }
            _ => panic!("Expected Synthesis error"),
        }
        assert!(synthesizer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mock_synthesizer_fails_on_specific_call() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = MockSynthesizer::new(dir.path()).with_failure_on(1);

        assert!(synthesizer.convert("one").await.is_ok());
        assert!(synthesizer.convert("two").await.is_err());
        assert!(synthesizer.convert("three").await.is_ok());

        assert_eq!(synthesizer.calls(), vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_synthesizer_trait_is_object_safe() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer: Box<dyn Synthesizer> = Box::new(MockSynthesizer::new(dir.path()));

        let path = synthesizer.convert("boxed").await.unwrap();
        assert!(path.exists());
    }
}
