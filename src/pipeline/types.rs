//! Data types for the response pipeline.
//!
//! Capture artifacts and synthesized segments are short-lived files passed
//! around by handle. The file is removed when the owning value drops, so
//! every artifact is reclaimed on exactly one exit path regardless of how a
//! turn ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Identifies the participant whose signals are authoritative for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a participant id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Removes a file-backed resource, logging failure.
///
/// Deletion failures are not fatal; a resource that is already gone leaves
/// nothing to reclaim.
fn remove_resource(kind: &str, path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "voxturn: failed to remove {} {}: {}",
            kind,
            path.display(),
            e
        );
    }
}

/// The finalized recording of one utterance.
///
/// Created when capture ends, consumed exactly once by transcription, and
/// dropped (deleting the file) immediately afterwards regardless of the
/// transcription outcome.
#[derive(Debug)]
pub struct CaptureArtifact {
    path: PathBuf,
}

impl CaptureArtifact {
    /// Wraps a finished recording file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the recorded audio file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CaptureArtifact {
    fn drop(&mut self) {
        remove_resource("capture artifact", &self.path);
    }
}

/// One synthesized unit of spoken reply, corresponding to one response chunk.
///
/// The sequence index is assigned at production time and is strictly
/// monotonic within a turn; playback follows it. The backing file is removed
/// when the segment drops: after it finishes playing, during an interruption
/// flush, or when a state guard rejects it.
#[derive(Debug)]
pub struct AudioSegment {
    path: PathBuf,
    sequence: u64,
}

impl AudioSegment {
    /// Wraps a synthesized audio file with its production index.
    pub fn new(path: impl Into<PathBuf>, sequence: u64) -> Self {
        Self {
            path: path.into(),
            sequence,
        }
    }

    /// Path of the playable audio file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Production order index within the turn.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Drop for AudioSegment {
    fn drop(&mut self) {
        remove_resource("segment", &self.path);
    }
}
