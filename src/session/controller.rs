//! The turn controller: one session, one event queue, one playback queue.
//!
//! External signals (capture activity, sink status) and internal completions
//! (recorded artifact, produced segments) all arrive as [`SessionEvent`]s on
//! a single queue. Handlers run to completion before the next event, so the
//! state machine never sees concurrent mutation; anything that suspends
//! (recording, engine calls) runs in a spawned task that posts its result
//! back as an event.

use crate::audio::capture::{CaptureSource, EndOfSpeechPolicy};
use crate::audio::recorder::Recorder;
use crate::audio::sink::AudioSink;
use crate::defaults;
use crate::error::VoxturnError;
use crate::notify::{PresentationNotifier, SessionStatus};
use crate::pipeline::producer::{PipelineHandle, ResponsePipeline};
use crate::pipeline::types::{AudioSegment, CaptureArtifact, ParticipantId};
use crate::session::events::{SessionEvent, SessionHandle};
use crate::session::queue::PlaybackQueue;
use crate::session::report::{LogReporter, SessionReporter};
use crate::session::state::{TurnSession, TurnState};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Drives one participant's conversational turns.
pub struct TurnController {
    session: TurnSession,
    queue: PlaybackQueue,
    capture: Arc<dyn CaptureSource>,
    recorder: Arc<dyn Recorder>,
    pipeline: ResponsePipeline,
    notifier: Arc<dyn PresentationNotifier>,
    reporter: Arc<dyn SessionReporter>,
    policy: EndOfSpeechPolicy,
    /// Progress marker of the active production; present only while
    /// producing.
    cursor: Option<PipelineHandle>,
    external_rx: mpsc::Receiver<SessionEvent>,
    internal_tx: mpsc::Sender<SessionEvent>,
    internal_rx: mpsc::Receiver<SessionEvent>,
}

impl TurnController {
    /// Creates a controller for `owner` and the handle external signals use
    /// to reach it.
    pub fn new(
        owner: ParticipantId,
        capture: Arc<dyn CaptureSource>,
        recorder: Arc<dyn Recorder>,
        pipeline: ResponsePipeline,
        sink: Arc<dyn AudioSink>,
        notifier: Arc<dyn PresentationNotifier>,
    ) -> (Self, SessionHandle) {
        let (external_tx, external_rx) = mpsc::channel(defaults::EVENT_QUEUE_DEPTH);
        let (internal_tx, internal_rx) = mpsc::channel(defaults::EVENT_QUEUE_DEPTH);
        let controller = Self {
            session: TurnSession::new(owner),
            queue: PlaybackQueue::new(sink),
            capture,
            recorder,
            pipeline,
            notifier,
            reporter: Arc::new(LogReporter),
            policy: EndOfSpeechPolicy::default(),
            cursor: None,
            external_rx,
            internal_tx,
            internal_rx,
        };
        (controller, SessionHandle::new(external_tx))
    }

    /// Sets a custom reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn SessionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the end-of-speech policy passed to the capture source.
    pub fn with_policy(mut self, policy: EndOfSpeechPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.session.state()
    }

    /// Consumes events until every external handle is gone and the current
    /// turn has finished.
    pub async fn run(mut self) {
        let mut external_open = true;
        loop {
            tokio::select! {
                event = self.external_rx.recv(), if external_open => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            // The platform side is gone; abort whatever turn
                            // is in flight, then wind down.
                            external_open = false;
                            self.abort_for_disconnect().await;
                        }
                    }
                }
                event = self.internal_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => break,
                    }
                }
            }
            if !external_open && self.session.state() == TurnState::Idle {
                break;
            }
        }
        // Dropping the controller reclaims anything still queued.
    }

    /// Applies one event through the state machine's guards.
    pub async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CaptureStarted(participant) => {
                self.on_capture_started(participant).await;
            }
            SessionEvent::CaptureEnded {
                participant,
                artifact,
            } => {
                self.on_capture_ended(participant, artifact).await;
            }
            SessionEvent::CaptureFailed { participant, error } => {
                self.on_capture_failed(participant, error).await;
            }
            SessionEvent::SinkIdle => self.on_sink_idle().await,
            SessionEvent::SinkUnavailable => self.on_sink_unavailable().await,
            SessionEvent::SegmentReady(segment) => self.on_segment_ready(segment).await,
            SessionEvent::PipelineExhausted => self.on_pipeline_exhausted().await,
            SessionEvent::PipelineFailed(error) => self.on_pipeline_failed(error).await,
        }
    }

    async fn on_capture_started(&mut self, participant: ParticipantId) {
        if !self.session.is_owner(&participant) {
            return;
        }
        let from = self.session.state();
        if !self.session.begin_listening() {
            // A turn is already active; the signal is rejected, not queued.
            return;
        }
        self.transitioned(from).await;

        let stream = match self
            .capture
            .subscribe(&participant, self.policy.clone())
            .await
        {
            Ok(stream) => stream,
            Err(error) => {
                self.reporter.failure("capture subscribe", &error);
                let from = self.session.state();
                self.session.reset();
                self.transitioned(from).await;
                return;
            }
        };

        let recorder = Arc::clone(&self.recorder);
        let events = self.internal_tx.clone();
        tokio::spawn(async move {
            let event = match recorder.record(stream).await {
                Ok(artifact) => SessionEvent::CaptureEnded {
                    participant,
                    artifact,
                },
                Err(error) => SessionEvent::CaptureFailed { participant, error },
            };
            let _ = events.send(event).await;
        });
    }

    async fn on_capture_ended(&mut self, participant: ParticipantId, artifact: CaptureArtifact) {
        if !self.session.is_owner(&participant) {
            // Dropping the artifact removes its file.
            return;
        }
        let from = self.session.state();
        if !self.session.begin_producing() {
            // Late or double-fired capture-end; the artifact is reclaimed.
            return;
        }
        self.transitioned(from).await;

        let (handle, mut stream) = self.pipeline.produce(artifact);
        self.cursor = Some(handle);

        let events = self.internal_tx.clone();
        tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                let delivered = match item {
                    Ok(segment) => events.send(SessionEvent::SegmentReady(segment)).await,
                    Err(error) => {
                        let _ = events.send(SessionEvent::PipelineFailed(error)).await;
                        return;
                    }
                };
                if delivered.is_err() {
                    return;
                }
            }
            let _ = events.send(SessionEvent::PipelineExhausted).await;
        });
    }

    async fn on_capture_failed(&mut self, participant: ParticipantId, error: VoxturnError) {
        if !self.session.is_owner(&participant) {
            return;
        }
        if self.session.state() != TurnState::Listening {
            return;
        }
        self.reporter.failure("capture", &error);
        let from = self.session.state();
        self.session.reset();
        self.transitioned(from).await;
    }

    async fn on_segment_ready(&mut self, segment: AudioSegment) {
        if self.session.state() != TurnState::Producing {
            // Cancellation took effect before this enqueue; the segment is
            // reclaimed on drop.
            return;
        }
        if let Err(error) = self.queue.enqueue(segment).await {
            self.reporter.failure("playback", &error);
            self.on_sink_unavailable().await;
        }
    }

    async fn on_pipeline_exhausted(&mut self) {
        match self.session.state() {
            TurnState::Producing => {
                self.cursor = None;
                let from = self.session.state();
                if self.queue.is_empty() {
                    self.session.reset();
                } else {
                    self.session.finish_production();
                }
                self.transitioned(from).await;
            }
            TurnState::Interrupted => {
                // The cancelled production has unwound; the turn is over.
                self.cursor = None;
                let from = self.session.state();
                self.session.reset();
                self.transitioned(from).await;
            }
            _ => {}
        }
    }

    async fn on_pipeline_failed(&mut self, error: VoxturnError) {
        match self.session.state() {
            TurnState::Producing => {
                self.reporter.failure("pipeline", &error);
                self.cursor = None;
                self.queue.flush();
                let from = self.session.state();
                self.session.reset();
                self.transitioned(from).await;
            }
            TurnState::Interrupted => {
                self.cursor = None;
                let from = self.session.state();
                self.session.reset();
                self.transitioned(from).await;
            }
            _ => {
                self.reporter.failure("pipeline", &error);
            }
        }
    }

    async fn on_sink_idle(&mut self) {
        match self.session.state() {
            TurnState::Producing => {
                if self.queue.is_empty() {
                    // Production is still running; wait for more segments.
                    return;
                }
                if let Err(error) = self.queue.on_sink_idle().await {
                    self.reporter.failure("playback", &error);
                    self.on_sink_unavailable().await;
                }
            }
            TurnState::Draining => {
                match self.queue.on_sink_idle().await {
                    Ok(true) => {}
                    Ok(false) => {
                        // Last segment played; the turn is complete.
                        let from = self.session.state();
                        self.session.reset();
                        self.transitioned(from).await;
                    }
                    Err(error) => {
                        self.reporter.failure("playback", &error);
                        self.on_sink_unavailable().await;
                    }
                }
            }
            // Stray sink-idle after the turn ended is a no-op.
            _ => {}
        }
    }

    async fn on_sink_unavailable(&mut self) {
        match self.session.state() {
            TurnState::Producing | TurnState::Draining => {
                if let Some(cursor) = &self.cursor {
                    cursor.cancel();
                }
                self.queue.flush();
                let from = self.session.state();
                self.session.interrupt();
                self.transitioned(from).await;

                if self.cursor.is_none() {
                    // No production left to unwind; finish immediately.
                    let from = self.session.state();
                    self.session.reset();
                    self.transitioned(from).await;
                }
            }
            _ => {}
        }
    }

    /// Aborts the active turn when the platform side disappears.
    ///
    /// No further sink or capture signals can arrive, so a turn left in a
    /// playback state would never drain on its own.
    async fn abort_for_disconnect(&mut self) {
        match self.session.state() {
            TurnState::Producing | TurnState::Draining => {
                self.on_sink_unavailable().await;
            }
            TurnState::Listening => {
                // The recorder's eventual completion will be a no-op; its
                // artifact is reclaimed by the capture-end guard.
                let from = self.session.state();
                self.session.reset();
                self.transitioned(from).await;
            }
            _ => {}
        }
    }

    /// Reports a taken transition and sends the best-effort presentation
    /// update.
    async fn transitioned(&self, from: TurnState) {
        let to = self.session.state();
        self.reporter.state_changed(self.session.owner(), from, to);

        let status = SessionStatus::from_state(self.session.owner(), to);
        if let Err(error) = self.notifier.notify(status).await {
            self.reporter.failure("presentation notify", &error);
        }
    }
}
