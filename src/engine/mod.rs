//! Collaborator traits for the three black-box engines of a turn:
//! transcription, conversation, and synthesis.
//!
//! Each trait ships with a builder-configurable mock so the pipeline and
//! controller can be exercised without real engines.

pub mod assistant;
pub mod synthesizer;
pub mod transcriber;

pub use assistant::{Assistant, ChunkStream, MockAssistant};
pub use synthesizer::{MockSynthesizer, Synthesizer};
pub use transcriber::{MockTranscriber, Transcriber};
