//! The single inbound event queue of a session.
//!
//! Every signal reaching a turn, external or internal, is one value on this
//! queue; the controller consumes them one at a time, so guard conditions
//! are testable without a live signal source.

use crate::error::VoxturnError;
use crate::pipeline::types::{AudioSegment, CaptureArtifact, ParticipantId};
use tokio::sync::mpsc;

/// Everything a turn reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    /// A participant began speaking.
    CaptureStarted(ParticipantId),
    /// A participant's capture stream ended and was finalized.
    CaptureEnded {
        participant: ParticipantId,
        artifact: CaptureArtifact,
    },
    /// Recording a participant's capture stream failed.
    CaptureFailed {
        participant: ParticipantId,
        error: VoxturnError,
    },
    /// The sink finished playing the current item.
    SinkIdle,
    /// The sink lost its output path.
    SinkUnavailable,
    /// The pipeline produced its next segment.
    SegmentReady(AudioSegment),
    /// The pipeline finished producing.
    PipelineExhausted,
    /// The pipeline failed; no further segments will arrive.
    PipelineFailed(VoxturnError),
}

/// Cloneable sender half of a session's event queue.
///
/// Platform adapters push external signals through this; the session closes
/// once every handle has been dropped and the current turn has finished.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Delivers an event to the session.
    ///
    /// # Returns
    /// false when the session is no longer accepting events
    pub async fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Signals that `participant` began speaking.
    pub async fn capture_started(&self, participant: ParticipantId) -> bool {
        self.send(SessionEvent::CaptureStarted(participant)).await
    }

    /// Signals that the sink finished its current item.
    pub async fn sink_idle(&self) -> bool {
        self.send(SessionEvent::SinkIdle).await
    }

    /// Signals that the sink lost its output path.
    pub async fn sink_unavailable(&self) -> bool {
        self.send(SessionEvent::SinkUnavailable).await
    }

    /// Whether the session has stopped accepting events.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Downgrades to a handle that does not keep the session alive.
    pub fn downgrade(&self) -> WeakSessionHandle {
        WeakSessionHandle {
            tx: self.tx.downgrade(),
        }
    }
}

/// Non-owning reference to a session's event queue.
///
/// Bookkeeping holders (the registry) use this so a finished session can
/// wind down even while still registered.
#[derive(Debug, Clone)]
pub struct WeakSessionHandle {
    tx: mpsc::WeakSender<SessionEvent>,
}

impl WeakSessionHandle {
    /// Recovers a sending handle while the session is still live.
    pub fn upgrade(&self) -> Option<SessionHandle> {
        self.tx.upgrade().map(SessionHandle::new)
    }
}
