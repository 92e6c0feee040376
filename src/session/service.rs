//! Session launch and lifecycle for the command layer.
//!
//! The service owns the shared collaborators and the session registry. A
//! platform adapter calls [`AssistService::engage`] with the channels its
//! signal sources feed; the service wires them into a controller, registers
//! the session, and tears everything down when the platform side closes its
//! channels.

use crate::audio::capture::{CaptureSignal, CaptureSource, EndOfSpeechPolicy};
use crate::audio::recorder::Recorder;
use crate::audio::sink::{AudioSink, SinkStatus};
use crate::config::Config;
use crate::engine::{Assistant, Synthesizer, Transcriber};
use crate::error::Result;
use crate::notify::PresentationNotifier;
use crate::pipeline::producer::ResponsePipeline;
use crate::pipeline::types::ParticipantId;
use crate::registry::SessionRegistry;
use crate::session::controller::TurnController;
use crate::session::report::{LogReporter, SessionReporter};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The collaborator set shared by every session the service launches.
pub struct SessionBackends {
    pub capture: Arc<dyn CaptureSource>,
    pub recorder: Arc<dyn Recorder>,
    pub transcriber: Arc<dyn Transcriber>,
    pub assistant: Arc<dyn Assistant>,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub sink: Arc<dyn AudioSink>,
    pub notifier: Arc<dyn PresentationNotifier>,
}

/// Launches and tracks one session per participant.
pub struct AssistService {
    backends: SessionBackends,
    registry: Arc<SessionRegistry>,
    reporter: Arc<dyn SessionReporter>,
    config: Config,
}

impl AssistService {
    /// Creates a service over the given collaborators.
    pub fn new(backends: SessionBackends, config: Config) -> Self {
        Self {
            backends,
            registry: Arc::new(SessionRegistry::new()),
            reporter: Arc::new(LogReporter),
            config,
        }
    }

    /// Sets a custom reporter passed to every session.
    pub fn with_reporter(mut self, reporter: Arc<dyn SessionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The registry of active sessions.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Starts a session for `owner`, fed by the platform's capture-signal
    /// and sink-status channels.
    ///
    /// The session ends when both channels close and the current turn has
    /// finished; it is deregistered at that point. A second engage for the
    /// same participant fails with `SessionActive`.
    ///
    /// # Returns
    /// Join handle completing when the session has fully ended
    pub async fn engage(
        &self,
        owner: ParticipantId,
        signals: mpsc::Receiver<CaptureSignal>,
        sink_status: mpsc::Receiver<SinkStatus>,
    ) -> Result<JoinHandle<()>> {
        let pipeline = ResponsePipeline::new(
            Arc::clone(&self.backends.transcriber),
            Arc::clone(&self.backends.assistant),
            Arc::clone(&self.backends.synthesizer),
        )
        .with_buffer(self.config.pipeline.segment_buffer);

        let policy = EndOfSpeechPolicy {
            trailing_silence_ms: self.config.capture.trailing_silence_ms,
        };

        let (controller, handle) = TurnController::new(
            owner.clone(),
            Arc::clone(&self.backends.capture),
            Arc::clone(&self.backends.recorder),
            pipeline,
            Arc::clone(&self.backends.sink),
            Arc::clone(&self.backends.notifier),
        );
        let controller = controller
            .with_reporter(Arc::clone(&self.reporter))
            .with_policy(policy);

        self.registry.register(owner.clone(), &handle).await?;

        spawn_signal_forwarder(signals, handle.clone());
        spawn_status_forwarder(sink_status, handle);

        let registry = Arc::clone(&self.registry);
        let join = tokio::spawn(async move {
            controller.run().await;
            let _ = registry.deregister(&owner).await;
        });
        Ok(join)
    }
}

/// Forwards speaking-activity signals into the session.
///
/// Only start signals drive the turn; the platform's own end signal carries
/// no artifact, the recorder's completion is the authoritative capture-end.
fn spawn_signal_forwarder(
    mut signals: mpsc::Receiver<CaptureSignal>,
    handle: crate::session::events::SessionHandle,
) {
    tokio::spawn(async move {
        while let Some(signal) = signals.recv().await {
            let delivered = match signal {
                CaptureSignal::Started(participant) => handle.capture_started(participant).await,
                CaptureSignal::Ended(_) => continue,
            };
            if !delivered {
                break;
            }
        }
        // Dropping the handle lets the session wind down.
    });
}

/// Forwards sink status signals into the session.
fn spawn_status_forwarder(
    mut sink_status: mpsc::Receiver<SinkStatus>,
    handle: crate::session::events::SessionHandle,
) {
    tokio::spawn(async move {
        while let Some(status) = sink_status.recv().await {
            let delivered = match status {
                SinkStatus::Idle => handle.sink_idle().await,
                SinkStatus::Unavailable => handle.sink_unavailable().await,
            };
            if !delivered {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::capture::MockCaptureSource;
    use crate::audio::recorder::MockRecorder;
    use crate::audio::sink::MockAudioSink;
    use crate::engine::{MockAssistant, MockSynthesizer, MockTranscriber};
    use crate::notify::MockNotifier;
    use std::path::Path;

    fn service(dir: &Path) -> AssistService {
        let backends = SessionBackends {
            capture: Arc::new(MockCaptureSource::new()),
            recorder: Arc::new(MockRecorder::new(dir)),
            transcriber: Arc::new(MockTranscriber::new()),
            assistant: Arc::new(MockAssistant::new()),
            synthesizer: Arc::new(MockSynthesizer::new(dir)),
            sink: Arc::new(MockAudioSink::new()),
            notifier: Arc::new(MockNotifier::new()),
        };
        AssistService::new(backends, Config::default())
    }

    #[tokio::test]
    async fn test_engage_registers_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let owner = ParticipantId::new("user-1");

        let (_signal_tx, signal_rx) = mpsc::channel(4);
        let (_status_tx, status_rx) = mpsc::channel(4);
        let join = service
            .engage(owner.clone(), signal_rx, status_rx)
            .await
            .unwrap();

        assert!(service.registry().get(&owner).await.is_some());

        drop(_signal_tx);
        drop(_status_tx);
        join.await.unwrap();
        assert!(service.registry().get(&owner).await.is_none());
    }

    #[tokio::test]
    async fn test_second_engage_for_same_owner_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let owner = ParticipantId::new("user-1");

        let (_tx1, rx1) = mpsc::channel(4);
        let (_tx2, rx2) = mpsc::channel(4);
        let _join = service.engage(owner.clone(), rx1, rx2).await.unwrap();

        let (_tx3, rx3) = mpsc::channel(4);
        let (_tx4, rx4) = mpsc::channel(4);
        let result = service.engage(owner, rx3, rx4).await;

        assert!(matches!(
            result,
            Err(crate::error::VoxturnError::SessionActive { .. })
        ));
    }

    #[tokio::test]
    async fn test_engages_for_different_owners_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let (_tx1, rx1) = mpsc::channel(4);
        let (_tx2, rx2) = mpsc::channel(4);
        let (_tx3, rx3) = mpsc::channel(4);
        let (_tx4, rx4) = mpsc::channel(4);

        let _a = service
            .engage(ParticipantId::new("user-1"), rx1, rx2)
            .await
            .unwrap();
        let _b = service
            .engage(ParticipantId::new("user-2"), rx3, rx4)
            .await
            .unwrap();

        assert_eq!(service.registry().len().await, 2);
    }
}
