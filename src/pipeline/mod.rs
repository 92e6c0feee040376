//! Streaming response pipeline for one conversational turn.
//!
//! A finished capture goes through transcription, conversation, and
//! synthesis; segments come out lazily, in order, over a bounded channel.

pub mod producer;
pub mod types;

pub use producer::{PipelineHandle, ResponsePipeline, SegmentStream};
pub use types::{AudioSegment, CaptureArtifact, ParticipantId};
