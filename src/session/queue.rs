//! Ordered playback of produced segments.
//!
//! The queue holds every produced-but-unplayed segment and drives the sink
//! strictly in production order. A segment's file is reclaimed the moment it
//! leaves the queue: after it finishes playing, or during a flush.

use crate::audio::sink::AudioSink;
use crate::error::Result;
use crate::pipeline::types::AudioSegment;
use std::collections::VecDeque;
use std::sync::Arc;

/// FIFO of pending segments driving one audio sink.
pub struct PlaybackQueue {
    sink: Arc<dyn AudioSink>,
    pending: VecDeque<AudioSegment>,
}

impl PlaybackQueue {
    /// Creates an empty queue over `sink`.
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            pending: VecDeque::new(),
        }
    }

    /// Number of pending segments, the currently playing one included.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued or playing.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Appends a segment; starts playback when nothing else is queued.
    pub async fn enqueue(&mut self, segment: AudioSegment) -> Result<()> {
        let start = self.pending.is_empty();
        self.pending.push_back(segment);
        if start
            && let Some(head) = self.pending.front()
        {
            self.sink.play(head.path()).await?;
        }
        Ok(())
    }

    /// The head segment finished playing: reclaim it and start the next.
    ///
    /// # Returns
    /// true while another segment is playing, false once the queue is empty
    pub async fn on_sink_idle(&mut self) -> Result<bool> {
        // Dropping the finished segment removes its file.
        drop(self.pending.pop_front());

        match self.pending.front() {
            Some(next) => {
                self.sink.play(next.path()).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discards every pending segment, the currently playing one included.
    ///
    /// # Returns
    /// Number of segments discarded
    pub fn flush(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::MockAudioSink;
    use std::path::PathBuf;

    fn segment(dir: &std::path::Path, sequence: u64) -> (PathBuf, AudioSegment) {
        let path = dir.join(format!("segment-{}.wav", sequence));
        std::fs::write(&path, b"riff").unwrap();
        (path.clone(), AudioSegment::new(path, sequence))
    }

    #[tokio::test]
    async fn test_enqueue_on_empty_queue_starts_playback() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let (path, seg) = segment(dir.path(), 0);
        queue.enqueue(seg).await.unwrap();

        assert_eq!(sink.played(), vec![path]);
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_enqueue_behind_playing_segment_does_not_play() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let (first_path, first) = segment(dir.path(), 0);
        let (_, second) = segment(dir.path(), 1);
        queue.enqueue(first).await.unwrap();
        queue.enqueue(second).await.unwrap();

        // Only the head was handed to the sink.
        assert_eq!(sink.played(), vec![first_path]);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_sink_idle_reclaims_head_and_advances() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let (first_path, first) = segment(dir.path(), 0);
        let (second_path, second) = segment(dir.path(), 1);
        queue.enqueue(first).await.unwrap();
        queue.enqueue(second).await.unwrap();

        let still_playing = queue.on_sink_idle().await.unwrap();

        assert!(still_playing);
        assert!(!first_path.exists(), "finished segment must be reclaimed");
        assert!(second_path.exists(), "playing segment must stay on disk");
        assert_eq!(sink.played(), vec![first_path, second_path.clone()]);

        let still_playing = queue.on_sink_idle().await.unwrap();
        assert!(!still_playing);
        assert!(!second_path.exists());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_segments_play_in_enqueue_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let mut paths = Vec::new();
        for sequence in 0..4 {
            let (path, seg) = segment(dir.path(), sequence);
            paths.push(path);
            queue.enqueue(seg).await.unwrap();
        }
        while queue.on_sink_idle().await.unwrap() {}

        assert_eq!(sink.played(), paths);
    }

    #[tokio::test]
    async fn test_sink_idle_on_empty_queue_is_a_noop() {
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let still_playing = queue.on_sink_idle().await.unwrap();

        assert!(!still_playing);
        assert!(sink.played().is_empty());
    }

    #[tokio::test]
    async fn test_flush_reclaims_every_pending_segment() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new();
        let mut queue = PlaybackQueue::new(Arc::new(sink.clone()));

        let mut paths = Vec::new();
        for sequence in 0..3 {
            let (path, seg) = segment(dir.path(), sequence);
            paths.push(path);
            queue.enqueue(seg).await.unwrap();
        }

        let discarded = queue.flush();

        assert_eq!(discarded, 3);
        assert!(queue.is_empty());
        for path in paths {
            assert!(!path.exists());
        }
    }

    #[tokio::test]
    async fn test_enqueue_propagates_play_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MockAudioSink::new().with_play_failure();
        let mut queue = PlaybackQueue::new(Arc::new(sink));

        let (path, seg) = segment(dir.path(), 0);
        let result = queue.enqueue(seg).await;

        assert!(result.is_err());
        // The segment stays queued; a flush reclaims it.
        assert_eq!(queue.len(), 1);
        queue.flush();
        assert!(!path.exists());
    }
}
