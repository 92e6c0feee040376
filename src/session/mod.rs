//! One conversational turn: state machine, playback queue, controller.
//!
//! The controller reacts to one signal at a time from a single inbound
//! event queue; suspendable work (recording, engine calls) runs in spawned
//! tasks that post completion events back onto the same queue.

pub mod controller;
pub mod events;
pub mod queue;
pub mod report;
pub mod service;
pub mod state;

pub use controller::TurnController;
pub use events::{SessionEvent, SessionHandle, WeakSessionHandle};
pub use queue::PlaybackQueue;
pub use report::{LogReporter, RecordingReporter, SessionReporter};
pub use service::{AssistService, SessionBackends};
pub use state::{TurnSession, TurnState};
