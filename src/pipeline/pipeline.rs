use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::config::PipelineConfig;
use super::events::PipelineEvents;
use super::stats::PipelineStats;
use crate::audio::{AudioBackend, SegmentRecorder};
use crate::capture::{CaptureOrchestrator, ScreenSource};
use crate::clients::{TranscriptionClient, VisionAnalysisClient};
use crate::recognition::{SingleFlightRecognizer, TextRecognizer};
use crate::store::CaptureStore;

/// The multimodal capture pipeline for one presentation session
pub struct PresentationPipeline {
    config: PipelineConfig,
    store: Arc<CaptureStore>,
    orchestrator: CaptureOrchestrator,
    recorder: SegmentRecorder,
    active: watch::Sender<bool>,
    activated_at: std::sync::Mutex<Option<DateTime<Utc>>>,
}

impl PresentationPipeline {
    pub fn new(
        config: PipelineConfig,
        recognizer: Arc<dyn TextRecognizer>,
        transcriber: Arc<dyn TranscriptionClient>,
        vision: Arc<dyn VisionAnalysisClient>,
        events: Arc<dyn PipelineEvents>,
    ) -> Self {
        let store = Arc::new(CaptureStore::new(config.late_writes));
        let single_flight = Arc::new(SingleFlightRecognizer::new(recognizer));

        let orchestrator = CaptureOrchestrator::new(
            config.orchestrator_config(),
            Arc::clone(&store),
            single_flight,
            vision,
            Arc::clone(&events),
        );

        let recorder = SegmentRecorder::new(
            config.recorder_config(),
            Arc::clone(&store),
            transcriber,
            events,
        );

        let (active, _) = watch::channel(false);

        Self {
            config,
            store,
            orchestrator,
            recorder,
            active,
            activated_at: std::sync::Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// The shared state store all producers write into
    pub fn store(&self) -> Arc<CaptureStore> {
        Arc::clone(&self.store)
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Observe activation flag transitions
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Flip the activation flag true and start both producers
    ///
    /// Device acquisition failure (microphone or display) is terminal
    /// for the session: nothing starts and the error is returned.
    pub async fn activate(
        &self,
        screen: Box<dyn ScreenSource>,
        microphone: Box<dyn AudioBackend>,
    ) -> Result<()> {
        if self.is_active() {
            warn!(session = %self.config.session_id, "pipeline already active");
            return Ok(());
        }

        info!(session = %self.config.session_id, "activating presentation pipeline");

        self.recorder
            .start(microphone)
            .await
            .context("Failed to start audio capture")?;

        if let Err(e) = self.orchestrator.start(screen).await {
            self.recorder.stop().await;
            return Err(e).context("Failed to start screen capture");
        }

        *self.activated_at.lock().unwrap() = Some(Utc::now());
        self.active.send_replace(true);
        Ok(())
    }

    /// Flip the activation flag false, stop both producers and release
    /// device streams
    ///
    /// In-flight recognition/analysis/transcription calls are not
    /// cancelled; the store's late-write policy governs their results.
    pub async fn deactivate(&self) -> PipelineStats {
        if self.is_active() {
            info!(session = %self.config.session_id, "deactivating presentation pipeline");
            self.active.send_replace(false);
            self.orchestrator.stop().await;
            self.recorder.stop().await;
            self.store.close();
        }
        self.stats()
    }

    /// Current session statistics
    pub fn stats(&self) -> PipelineStats {
        let snapshot = self.store.snapshot();
        let activated_at = *self.activated_at.lock().unwrap();
        let duration_secs = activated_at
            .map(|t| {
                Utc::now()
                    .signed_duration_since(t)
                    .num_milliseconds()
                    .max(0) as f64
                    / 1000.0
            })
            .unwrap_or(0.0);

        PipelineStats {
            is_active: self.is_active(),
            activated_at,
            duration_secs,
            frames_sampled: self.orchestrator.frames_sampled(),
            significant_changes: self.orchestrator.significant_changes(),
            segments_dispatched: self.recorder.segments_dispatched(),
            segments_transcribed: self.recorder.segments_transcribed(),
            captures_retained: snapshot.screen_captures.len(),
            log_entries_retained: snapshot.capture_logs.len(),
            transcript_words: snapshot.transcript_word_count(),
            technologies_detected: snapshot.technologies.len(),
        }
    }

    /// Clear all captured state for a fresh session
    pub fn reset(&self) {
        self.store.reset();
    }
}
