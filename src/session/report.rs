//! Reporting of session state changes and swallowed failures.

use crate::error::VoxturnError;
use crate::pipeline::types::ParticipantId;
use crate::session::state::TurnState;
use std::sync::Mutex;

/// Trait for observing what a session does.
///
/// Presentation-notify failures and pipeline errors never propagate out of
/// the controller; they end up here instead.
pub trait SessionReporter: Send + Sync {
    /// A guarded transition was taken.
    fn state_changed(&self, owner: &ParticipantId, from: TurnState, to: TurnState);

    /// A failure was handled (logged) without ending the process.
    fn failure(&self, context: &str, error: &VoxturnError);
}

/// Simple reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl SessionReporter for LogReporter {
    fn state_changed(&self, owner: &ParticipantId, from: TurnState, to: TurnState) {
        eprintln!("voxturn: [{}] {} -> {}", owner, from, to);
    }

    fn failure(&self, context: &str, error: &VoxturnError) {
        eprintln!("voxturn: {}: {}", context, error);
    }
}

/// Reporter that records everything it sees, for tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    transitions: Mutex<Vec<(TurnState, TurnState)>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Create an empty recording reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions observed so far, in order
    pub fn transitions(&self) -> Vec<(TurnState, TurnState)> {
        self.transitions
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// States entered so far, in order
    pub fn states(&self) -> Vec<TurnState> {
        self.transitions().into_iter().map(|(_, to)| to).collect()
    }

    /// Failure messages observed so far
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl SessionReporter for RecordingReporter {
    fn state_changed(&self, _owner: &ParticipantId, from: TurnState, to: TurnState) {
        if let Ok(mut transitions) = self.transitions.lock() {
            transitions.push((from, to));
        }
    }

    fn failure(&self, context: &str, error: &VoxturnError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(format!("{}: {}", context, error));
        }
    }
}
