//! Audio boundary of a turn: the platform capture feed on the way in, the
//! playback sink on the way out.
//!
//! Everything here crosses the boundary as complete file artifacts or typed
//! signals; no raw frame processing happens in this crate.

pub mod capture;
pub mod recorder;
pub mod sink;

pub use capture::{CaptureSignal, CaptureSource, CaptureStream, EndOfSpeechPolicy, MockCaptureSource};
pub use recorder::{FileRecorder, MockRecorder, Recorder};
pub use sink::{AudioSink, MockAudioSink, SinkStatus};
