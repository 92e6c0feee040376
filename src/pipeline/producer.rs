//! Streaming response production for one turn.
//!
//! Runs transcription → conversation → synthesis as a producer task and
//! yields segments over a bounded channel in production order. The consumer
//! pulls lazily and can cancel at any point; after cancellation the producer
//! issues no further engine calls.

use crate::defaults;
use crate::engine::{Assistant, Synthesizer, Transcriber};
use crate::error::Result;
use crate::pipeline::types::{AudioSegment, CaptureArtifact};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Handle to an active production.
///
/// Exists only while the pipeline produces; cancelling stops all further
/// upstream engine calls. Segments already yielded are the consumer's
/// responsibility.
#[derive(Debug, Clone)]
pub struct PipelineHandle {
    cancelled: Arc<AtomicBool>,
}

impl PipelineHandle {
    /// Stops the producer before its next upstream call.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once the production has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Ordered, lazy sequence of produced segments.
///
/// An `Err` item is terminal; the stream ending without one means production
/// ran to exhaustion.
#[derive(Debug)]
pub struct SegmentStream {
    rx: mpsc::Receiver<Result<AudioSegment>>,
}

impl SegmentStream {
    /// Next produced segment; `None` once production is exhausted.
    pub async fn next(&mut self) -> Option<Result<AudioSegment>> {
        self.rx.recv().await
    }
}

/// The transcription → conversation → synthesis pipeline for one capture.
pub struct ResponsePipeline {
    transcriber: Arc<dyn Transcriber>,
    assistant: Arc<dyn Assistant>,
    synthesizer: Arc<dyn Synthesizer>,
    buffer: usize,
}

impl ResponsePipeline {
    /// Creates a pipeline over the three engines.
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        assistant: Arc<dyn Assistant>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            transcriber,
            assistant,
            synthesizer,
            buffer: defaults::SEGMENT_BUFFER,
        }
    }

    /// Sets the produced-segment channel capacity.
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Starts producing segments for one finished capture.
    ///
    /// The artifact is transcribed exactly once and its file removed
    /// immediately afterwards, whatever happens later in the turn.
    pub fn produce(&self, artifact: CaptureArtifact) -> (PipelineHandle, SegmentStream) {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel(self.buffer);

        let transcriber = Arc::clone(&self.transcriber);
        let assistant = Arc::clone(&self.assistant);
        let synthesizer = Arc::clone(&self.synthesizer);
        let flag = Arc::clone(&cancelled);

        tokio::spawn(async move {
            run_producer(transcriber, assistant, synthesizer, artifact, flag, tx).await;
        });

        (PipelineHandle { cancelled }, SegmentStream { rx })
    }
}

async fn run_producer(
    transcriber: Arc<dyn Transcriber>,
    assistant: Arc<dyn Assistant>,
    synthesizer: Arc<dyn Synthesizer>,
    artifact: CaptureArtifact,
    cancelled: Arc<AtomicBool>,
    tx: mpsc::Sender<Result<AudioSegment>>,
) {
    if cancelled.load(Ordering::SeqCst) {
        // Dropping the artifact removes its file.
        return;
    }

    let transcript = {
        let converted = transcriber.convert(&artifact).await;
        // The artifact is consumed by transcription; remove it now,
        // independent of the outcome.
        drop(artifact);
        match converted {
            Ok(text) => text,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    };

    if cancelled.load(Ordering::SeqCst) {
        return;
    }

    let mut chunks = match assistant.chat(&transcript).await {
        Ok(chunks) => chunks,
        Err(e) => {
            let _ = tx.send(Err(e)).await;
            return;
        }
    };

    let mut sequence = 0u64;
    while let Some(chunk) = chunks.recv().await {
        let text = match chunk {
            Ok(text) => text,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };

        if cancelled.load(Ordering::SeqCst) {
            return;
        }

        match synthesizer.convert(&text).await {
            Ok(path) => {
                let segment = AudioSegment::new(path, sequence);
                sequence += 1;
                if tx.send(Ok(segment)).await.is_err() {
                    // Receiver gone; the returned segment drops here and
                    // removes its file.
                    return;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }
    // Dropping the sender closes the stream: production is exhausted.
}
