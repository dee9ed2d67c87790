use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::backend::AudioBackend;
use super::segment::{AudioSegment, SegmentEncoder};
use crate::clients::TranscriptionClient;
use crate::pipeline::PipelineEvents;
use crate::store::{excerpt, CaptureLogEntry, CaptureStore, LogKind};

/// Segment recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// How long each recording segment runs before rotation
    pub segment_duration: Duration,
    /// Segments encoded below this byte size are discarded before any
    /// network call
    pub min_segment_bytes: usize,
    /// Continuous mode: rotate and transcribe while recording; when
    /// false, the whole session is flushed once at stop
    pub continuous: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            segment_duration: Duration::from_millis(10_000),
            min_segment_bytes: 1000,
            continuous: true,
        }
    }
}

struct RecorderShared {
    config: RecorderConfig,
    store: Arc<CaptureStore>,
    transcriber: Arc<dyn TranscriptionClient>,
    events: Arc<dyn PipelineEvents>,
    segments_dispatched: AtomicUsize,
    segments_transcribed: AtomicUsize,
}

impl RecorderShared {
    /// Hand one segment to the transcription client, fire-and-forget
    ///
    /// Undersized segments are skipped here, before any network call.
    /// Transcription failures are logged and swallowed; the recording
    /// loop is never interrupted and there is no retry.
    fn dispatch_segment(self: &Arc<Self>, segment: AudioSegment) {
        if segment.bytes.len() < self.config.min_segment_bytes {
            debug!(
                bytes = segment.bytes.len(),
                min = self.config.min_segment_bytes,
                "segment below minimum size, skipping transcription"
            );
            return;
        }

        self.segments_dispatched.fetch_add(1, Ordering::SeqCst);

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            match shared.transcriber.transcribe(&segment).await {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        return;
                    }
                    shared.store.append_transcript(&text);
                    shared.store.push_log(
                        CaptureLogEntry::new(
                            LogKind::Speech,
                            format!("Speech: \"{}\"", excerpt(&text, 50)),
                        )
                        .with_preview(text.clone()),
                    );
                    shared.events.on_transcript(&text);
                    shared.segments_transcribed.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => warn!("transcription failed: {e:#}"),
            }
        });
    }
}

/// Continuous microphone recorder with time-boxed segment rotation
///
/// Two states: Idle and Recording. While recording, buffered frames are
/// flushed into one segment every `segment_duration` and a fresh
/// accumulation begins immediately; the final partial segment is flushed
/// on stop. The backend is released on every exit path.
pub struct SegmentRecorder {
    shared: Arc<RecorderShared>,
    is_recording: Arc<AtomicBool>,
    active: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SegmentRecorder {
    pub fn new(
        config: RecorderConfig,
        store: Arc<CaptureStore>,
        transcriber: Arc<dyn TranscriptionClient>,
        events: Arc<dyn PipelineEvents>,
    ) -> Self {
        let (active, _) = watch::channel(false);
        Self {
            shared: Arc::new(RecorderShared {
                config,
                store,
                transcriber,
                events,
                segments_dispatched: AtomicUsize::new(0),
                segments_transcribed: AtomicUsize::new(0),
            }),
            is_recording: Arc::new(AtomicBool::new(false)),
            active,
            task: Mutex::new(None),
        }
    }

    /// Transition Idle -> Recording
    ///
    /// Acquisition failure (device unavailable, permission denied) is
    /// returned to the caller and the recorder stays Idle.
    pub async fn start(&self, mut backend: Box<dyn AudioBackend>) -> Result<()> {
        if self.is_recording.swap(true, Ordering::SeqCst) {
            warn!("recording already active");
            return Ok(());
        }

        let frames = match backend.start().await.context("Failed to acquire microphone") {
            Ok(rx) => rx,
            Err(e) => {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        info!(backend = backend.name(), "segment recorder started");
        self.active.send_replace(true);

        let shared = Arc::clone(&self.shared);
        let is_recording = Arc::clone(&self.is_recording);
        let active_rx = self.active.subscribe();
        let task = tokio::spawn(run_segment_loop(
            shared,
            is_recording,
            active_rx,
            backend,
            frames,
        ));

        *self.task.lock().await = Some(task);
        Ok(())
    }

    /// Transition Recording -> Idle, flushing the final partial segment
    pub async fn stop(&self) {
        self.active.send_replace(false);

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                error!("recorder task panicked: {e}");
            }
        }

        self.is_recording.store(false, Ordering::SeqCst);
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Size-guard and dispatch one segment (the rotation flush path)
    pub fn dispatch_segment(&self, segment: AudioSegment) {
        self.shared.dispatch_segment(segment);
    }

    /// Segments that passed the size guard and were sent for transcription
    pub fn segments_dispatched(&self) -> usize {
        self.shared.segments_dispatched.load(Ordering::SeqCst)
    }

    /// Segments whose transcription resolved successfully
    pub fn segments_transcribed(&self) -> usize {
        self.shared.segments_transcribed.load(Ordering::SeqCst)
    }
}

async fn run_segment_loop(
    shared: Arc<RecorderShared>,
    is_recording: Arc<AtomicBool>,
    mut active: watch::Receiver<bool>,
    mut backend: Box<dyn AudioBackend>,
    mut frames: mpsc::Receiver<crate::audio::AudioFrame>,
) {
    let mut encoder = SegmentEncoder::new();
    let segment_duration = shared.config.segment_duration;
    let mut rotation = interval_at(Instant::now() + segment_duration, segment_duration);
    rotation.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            maybe = frames.recv() => match maybe {
                Some(frame) => encoder.push(&frame),
                // Device stream ended (abnormal teardown included)
                None => break,
            },
            _ = rotation.tick() => {
                if shared.config.continuous {
                    flush(&shared, &mut encoder);
                }
            }
            changed = active.changed() => {
                if changed.is_err() || !*active.borrow() {
                    break;
                }
            }
        }
    }

    // Final partial segment goes through the same size guard
    flush(&shared, &mut encoder);

    if let Err(e) = backend.stop().await {
        error!("failed to release audio backend: {e:#}");
    }
    is_recording.store(false, Ordering::SeqCst);
    info!("segment recorder stopped");
}

fn flush(shared: &Arc<RecorderShared>, encoder: &mut SegmentEncoder) {
    if !encoder.is_empty() {
        debug!(samples = encoder.buffered_samples(), "flushing audio segment");
    }
    match encoder.take_segment() {
        Ok(Some(segment)) => shared.dispatch_segment(segment),
        Ok(None) => {}
        Err(e) => warn!("failed to encode audio segment: {e:#}"),
    }
}
