//! voxturn - Conversational voice turn controller
//!
//! Capture one participant's utterance, transcribe it, stream the reply
//! through synthesis, and play the segments back in order, with interruption
//! and exactly-once resource cleanup.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod registry;
pub mod session;

// Core traits (platform boundary → engines → presentation)
pub use audio::capture::{CaptureSignal, CaptureSource, CaptureStream, EndOfSpeechPolicy};
pub use audio::recorder::{FileRecorder, Recorder};
pub use audio::sink::{AudioSink, SinkStatus};
pub use engine::{Assistant, ChunkStream, Synthesizer, Transcriber};
pub use notify::{PresentationNotifier, SessionStatus};

// Turn machinery
pub use pipeline::producer::{PipelineHandle, ResponsePipeline, SegmentStream};
pub use pipeline::types::{AudioSegment, CaptureArtifact, ParticipantId};
pub use registry::SessionRegistry;
pub use session::{
    AssistService, PlaybackQueue, SessionBackends, SessionEvent, SessionHandle, SessionReporter,
    TurnController, TurnSession, TurnState, WeakSessionHandle,
};

// Error handling
pub use error::{Result, VoxturnError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
