//! The authoritative status of one conversational turn.
//!
//! Transitions are guarded: a method returns true only when the transition
//! was taken, so callers can treat redundant or late signals as no-ops
//! without extra bookkeeping. Event sources may double-fire.

use crate::pipeline::types::ParticipantId;
use std::fmt;

/// States of one conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No capture in progress, queue empty.
    Idle,
    /// Capture signal received for the owning participant; artifact not yet
    /// finalized.
    Listening,
    /// Capture finalized; pipeline generating segments.
    Producing,
    /// Production finished; queued segments still playing out.
    Draining,
    /// The sink became unavailable; pending segments discarded, no new
    /// segments accepted while the pipeline unwinds.
    Interrupted,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnState::Idle => "idle",
            TurnState::Listening => "listening",
            TurnState::Producing => "producing",
            TurnState::Draining => "draining",
            TurnState::Interrupted => "interrupted",
        };
        write!(f, "{}", name)
    }
}

/// One conversational exchange for one participant.
#[derive(Debug)]
pub struct TurnSession {
    owner: ParticipantId,
    state: TurnState,
}

impl TurnSession {
    /// Creates an idle session owned by `owner`.
    pub fn new(owner: ParticipantId) -> Self {
        Self {
            owner,
            state: TurnState::Idle,
        }
    }

    /// The participant whose signals are authoritative for this session.
    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether `participant` owns this session.
    pub fn is_owner(&self, participant: &ParticipantId) -> bool {
        &self.owner == participant
    }

    /// Idle → Listening. A capture-start during an active turn is rejected.
    pub fn begin_listening(&mut self) -> bool {
        self.take(TurnState::Idle, TurnState::Listening)
    }

    /// Listening → Producing. Capture-end is only honored while listening.
    pub fn begin_producing(&mut self) -> bool {
        self.take(TurnState::Listening, TurnState::Producing)
    }

    /// Producing → Draining, once the pipeline is exhausted.
    pub fn finish_production(&mut self) -> bool {
        self.take(TurnState::Producing, TurnState::Draining)
    }

    /// Producing | Draining → Interrupted, when the sink becomes unavailable.
    pub fn interrupt(&mut self) -> bool {
        match self.state {
            TurnState::Producing | TurnState::Draining => {
                self.state = TurnState::Interrupted;
                true
            }
            _ => false,
        }
    }

    /// Any non-idle state → Idle, ending the turn.
    pub fn reset(&mut self) -> bool {
        if self.state == TurnState::Idle {
            return false;
        }
        self.state = TurnState::Idle;
        true
    }

    fn take(&mut self, from: TurnState, to: TurnState) -> bool {
        if self.state == from {
            self.state = to;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TurnSession {
        TurnSession::new(ParticipantId::new("user-1"))
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session();
        assert_eq!(session.state(), TurnState::Idle);
        assert_eq!(session.owner().as_str(), "user-1");
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut session = session();
        assert!(session.begin_listening());
        assert_eq!(session.state(), TurnState::Listening);
        assert!(session.begin_producing());
        assert_eq!(session.state(), TurnState::Producing);
        assert!(session.finish_production());
        assert_eq!(session.state(), TurnState::Draining);
        assert!(session.reset());
        assert_eq!(session.state(), TurnState::Idle);
    }

    #[test]
    fn test_capture_start_rejected_during_active_turn() {
        let mut session = session();
        assert!(session.begin_listening());
        assert!(!session.begin_listening());
        assert_eq!(session.state(), TurnState::Listening);

        assert!(session.begin_producing());
        assert!(!session.begin_listening());
        assert_eq!(session.state(), TurnState::Producing);
    }

    #[test]
    fn test_capture_end_only_honored_while_listening() {
        let mut session = session();
        assert!(!session.begin_producing());
        assert_eq!(session.state(), TurnState::Idle);

        session.begin_listening();
        session.begin_producing();
        // A double-fired capture-end is a no-op.
        assert!(!session.begin_producing());
        assert_eq!(session.state(), TurnState::Producing);
    }

    #[test]
    fn test_interrupt_from_producing() {
        let mut session = session();
        session.begin_listening();
        session.begin_producing();
        assert!(session.interrupt());
        assert_eq!(session.state(), TurnState::Interrupted);
    }

    #[test]
    fn test_interrupt_from_draining() {
        let mut session = session();
        session.begin_listening();
        session.begin_producing();
        session.finish_production();
        assert!(session.interrupt());
        assert_eq!(session.state(), TurnState::Interrupted);
    }

    #[test]
    fn test_interrupt_is_rejected_outside_playback_states() {
        let mut session = session();
        assert!(!session.interrupt());

        session.begin_listening();
        assert!(!session.interrupt());
        assert_eq!(session.state(), TurnState::Listening);
    }

    #[test]
    fn test_reset_from_any_active_state() {
        for advance in [0usize, 1, 2, 3] {
            let mut session = session();
            if advance >= 1 {
                session.begin_listening();
            }
            if advance >= 2 {
                session.begin_producing();
            }
            if advance >= 3 {
                session.interrupt();
            }
            if advance == 0 {
                assert!(!session.reset());
            } else {
                assert!(session.reset());
            }
            assert_eq!(session.state(), TurnState::Idle);
        }
    }

    #[test]
    fn test_ownership_check() {
        let session = session();
        assert!(session.is_owner(&ParticipantId::new("user-1")));
        assert!(!session.is_owner(&ParticipantId::new("user-2")));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TurnState::Idle.to_string(), "idle");
        assert_eq!(TurnState::Listening.to_string(), "listening");
        assert_eq!(TurnState::Producing.to_string(), "producing");
        assert_eq!(TurnState::Draining.to_string(), "draining");
        assert_eq!(TurnState::Interrupted.to_string(), "interrupted");
    }
}
