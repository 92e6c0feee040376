//! Best-effort status notifications for a presentation surface.
//!
//! The controller reports every externally visible state change here so a
//! platform adapter can update whatever surface started the session (a
//! button row, a status line). Failures are logged and never affect session
//! state.

use crate::error::{Result, VoxturnError};
use crate::pipeline::types::ParticipantId;
use crate::session::state::TurnState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Presentation-facing status of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    /// The turn is idle; the surface can accept a new request.
    Ready { participant: String },
    /// The participant is being recorded.
    Listening { participant: String },
    /// The utterance is being transcribed and answered.
    Processing { participant: String },
    /// The reply is playing out.
    Speaking { participant: String },
    /// Playback was interrupted; the turn is being torn down.
    Interrupted { participant: String },
}

impl SessionStatus {
    /// Maps a turn state onto its presentation status.
    pub fn from_state(owner: &ParticipantId, state: TurnState) -> Self {
        let participant = owner.as_str().to_string();
        match state {
            TurnState::Idle => SessionStatus::Ready { participant },
            TurnState::Listening => SessionStatus::Listening { participant },
            TurnState::Producing => SessionStatus::Processing { participant },
            TurnState::Draining => SessionStatus::Speaking { participant },
            TurnState::Interrupted => SessionStatus::Interrupted { participant },
        }
    }

    /// Serialize status to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize status from JSON string.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Trait for delivering status updates to a presentation surface.
#[async_trait]
pub trait PresentationNotifier: Send + Sync {
    /// Deliver one status update. Best effort; the caller logs failures.
    async fn notify(&self, status: SessionStatus) -> Result<()>;
}

/// Notifier that logs each status to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl PresentationNotifier for LogNotifier {
    async fn notify(&self, status: SessionStatus) -> Result<()> {
        match status.to_json() {
            Ok(json) => eprintln!("voxturn: status {}", json),
            Err(e) => eprintln!("voxturn: status (unserializable): {}", e),
        }
        Ok(())
    }
}

/// Mock notifier for testing
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    statuses: Arc<Mutex<Vec<SessionStatus>>>,
    should_fail: bool,
}

impl MockNotifier {
    /// Create a new mock notifier with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on notify
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Statuses delivered so far, in order
    pub fn statuses(&self) -> Vec<SessionStatus> {
        self.statuses.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PresentationNotifier for MockNotifier {
    async fn notify(&self, status: SessionStatus) -> Result<()> {
        if self.should_fail {
            return Err(VoxturnError::Notify {
                message: "mock notify failure".to_string(),
            });
        }
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.push(status);
        }
        Ok(())
    }
}
