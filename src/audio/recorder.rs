//! Recording of a capture stream into a finished artifact.
//!
//! The recorder spools raw chunks to a file until the stream ends, then
//! hands the finalized artifact to the caller.

use crate::audio::capture::CaptureStream;
use crate::defaults;
use crate::error::{Result, VoxturnError};
use crate::pipeline::types::CaptureArtifact;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

/// Trait for spooling one capture stream to a finished artifact.
///
/// `record` completes when the stream ends, which the platform's
/// end-of-speech policy guarantees will happen.
#[async_trait]
pub trait Recorder: Send + Sync {
    /// Record a capture stream to completion.
    ///
    /// # Returns
    /// The finalized capture artifact, or a capture error
    async fn record(&self, stream: CaptureStream) -> Result<CaptureArtifact>;
}

/// Recorder writing capture chunks to files in a spool directory.
#[derive(Debug)]
pub struct FileRecorder {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FileRecorder {
    /// Create a recorder spooling into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    fn next_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.dir
            .join(format!("{}-{:06}.pcm", defaults::CAPTURE_PREFIX, n))
    }
}

#[async_trait]
impl Recorder for FileRecorder {
    async fn record(&self, mut stream: CaptureStream) -> Result<CaptureArtifact> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.next_path();
        let mut file = tokio::fs::File::create(&path).await?;

        while let Some(chunk) = stream.next_chunk().await {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(CaptureArtifact::new(path))
    }
}

/// Mock recorder for testing
#[derive(Debug)]
pub struct MockRecorder {
    inner: FileRecorder,
    should_fail: bool,
}

impl MockRecorder {
    /// Create a new mock recorder spooling into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileRecorder::new(dir),
            should_fail: false,
        }
    }

    /// Configure the mock to fail on record
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Recorder for MockRecorder {
    async fn record(&self, stream: CaptureStream) -> Result<CaptureArtifact> {
        if self.should_fail {
            return Err(VoxturnError::Capture {
                message: "mock recording failure".to_string(),
            });
        }
        self.inner.record(stream).await
    }
}

/// Implement Recorder for Arc<T> to allow sharing across sessions.
#[async_trait]
impl<T: Recorder> Recorder for Arc<T> {
    async fn record(&self, stream: CaptureStream) -> Result<CaptureArtifact> {
        (**self).record(stream).await
    }
}
