//! Explicitly constructed registry of active sessions.
//!
//! One session per participant: registration happens at session start,
//! deregistration at session end, and a second start for the same
//! participant is rejected rather than queued. The registry is passed to
//! whoever launches sessions; there is no ambient global.

use crate::error::{Result, VoxturnError};
use crate::pipeline::types::ParticipantId;
use crate::session::events::{SessionHandle, WeakSessionHandle};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::Mutex;

/// Active sessions keyed by owning participant.
///
/// Entries hold weak handles so a registered session can still wind down;
/// deregistration removes the slot and frees the participant for a fresh
/// session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: Mutex<HashMap<ParticipantId, WeakSessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for `owner`.
    ///
    /// # Errors
    /// `SessionActive` when the participant already has a session
    pub async fn register(&self, owner: ParticipantId, handle: &SessionHandle) -> Result<()> {
        let mut active = self.active.lock().await;
        match active.entry(owner) {
            Entry::Vacant(slot) => {
                slot.insert(handle.downgrade());
                Ok(())
            }
            Entry::Occupied(slot) => Err(VoxturnError::SessionActive {
                participant: slot.key().to_string(),
            }),
        }
    }

    /// Removes the session registered for `owner`.
    ///
    /// # Returns
    /// true when a session was registered
    pub async fn deregister(&self, owner: &ParticipantId) -> bool {
        self.active.lock().await.remove(owner).is_some()
    }

    /// Handle of the live session registered for `owner`, if any.
    pub async fn get(&self, owner: &ParticipantId) -> Option<SessionHandle> {
        self.active
            .lock()
            .await
            .get(owner)
            .and_then(|weak| weak.upgrade())
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.active.lock().await.len()
    }

    /// Whether no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.active.lock().await.is_empty()
    }
}
