use crate::defaults;
use crate::error::{Result, VoxturnError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Ordered, lazy sequence of response text chunks from one exchange.
///
/// Each chunk becomes available independently; the channel closing marks the
/// end of the response. An `Err` item is terminal.
pub type ChunkStream = mpsc::Receiver<Result<String>>;

/// Trait for the conversational engine.
///
/// One exchange per call: the engine receives the transcribed utterance and
/// yields its reply as an ordered sequence of text chunks. A started exchange
/// is not restartable.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Start a one-shot exchange for the given prompt.
    ///
    /// # Returns
    /// Receiver of response chunks in reply order, or a conversation error
    /// if the exchange could not be opened.
    async fn chat(&self, prompt: &str) -> Result<ChunkStream>;
}

/// Mock assistant for testing
#[derive(Debug, Clone)]
pub struct MockAssistant {
    chunks: Vec<String>,
    should_fail: bool,
    fail_after: Option<usize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAssistant {
    /// Create a new mock assistant with default settings
    pub fn new() -> Self {
        Self {
            chunks: vec!["mock response".to_string()],
            should_fail: false,
            fail_after: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to yield specific response chunks
    pub fn with_chunks(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Configure the mock to fail when opening the exchange
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to yield `n` chunks and then a terminal error
    pub fn with_failure_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn chat(&self, prompt: &str) -> Result<ChunkStream> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if self.should_fail {
            return Err(VoxturnError::Conversation {
                message: "mock conversation failure".to_string(),
            });
        }

        let capacity = (self.chunks.len() + 1).max(defaults::CHUNK_BUFFER);
        let (tx, rx) = mpsc::channel(capacity);
        for (index, chunk) in self.chunks.iter().enumerate() {
            if self.fail_after.is_some_and(|n| index >= n) {
                break;
            }
            let _ = tx.try_send(Ok(chunk.clone()));
        }
        if self.fail_after.is_some() {
            let _ = tx.try_send(Err(VoxturnError::Conversation {
                message: "mock conversation failure".to_string(),
            }));
        }
        // Dropping the sender ends the stream.
        Ok(rx)
    }
}
